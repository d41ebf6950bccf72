//! Core configuration loaded from environment variables.
//!
//! Every setting has a default, so `CoreConfig::default()` is a complete
//! configuration for tests and local runs.

use std::time::Duration;

use outofoffice_shared::constants::{
    NOTIFICATION_POLL_MS, NOTIFICATION_PREVIEW_CHARS, NOTIFICATION_PROCESSED_CAPACITY,
    NOTIFICATION_RECENT_LIMIT, NOTIFICATION_WINDOW_SECS,
};
use outofoffice_shared::types::MatchMode;

/// Core configuration.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    /// How likes become matches.
    /// Env: `OOO_MATCH_MODE` (`one-sided` | `mutual`)
    /// Default: `one-sided`
    pub match_mode: MatchMode,

    pub notifications: NotificationConfig,
}

/// Settings of a [`NotificationSession`](crate::NotificationSession).
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Delay between two polls of the message log.
    /// Env: `OOO_NOTIFY_POLL_MS`
    /// Default: 2000 ms
    pub poll_interval: Duration,

    /// Messages older than this never notify.
    /// Env: `OOO_NOTIFY_WINDOW_SECS`
    /// Default: 300 s
    pub recent_window: Duration,

    /// Number of newest messages inspected per poll.
    /// Env: `OOO_NOTIFY_RECENT_LIMIT`
    /// Default: 50
    pub recent_limit: usize,

    /// Processed message ids remembered before the oldest are evicted.
    pub processed_capacity: usize,

    /// Body preview length in characters.
    pub preview_chars: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(NOTIFICATION_POLL_MS),
            recent_window: Duration::from_secs(NOTIFICATION_WINDOW_SECS),
            recent_limit: NOTIFICATION_RECENT_LIMIT,
            processed_capacity: NOTIFICATION_PROCESSED_CAPACITY,
            preview_chars: NOTIFICATION_PREVIEW_CHARS,
        }
    }
}

impl CoreConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("OOO_MATCH_MODE") {
            match val.parse::<MatchMode>() {
                Ok(mode) => config.match_mode = mode,
                Err(e) => tracing::warn!(value = %val, error = %e, "Invalid OOO_MATCH_MODE, using default"),
            }
        }

        if let Some(ms) = parse_number(&lookup, "OOO_NOTIFY_POLL_MS") {
            config.notifications.poll_interval = Duration::from_millis(ms);
        }

        if let Some(secs) = parse_number(&lookup, "OOO_NOTIFY_WINDOW_SECS") {
            config.notifications.recent_window = Duration::from_secs(secs);
        }

        if let Some(limit) = parse_number(&lookup, "OOO_NOTIFY_RECENT_LIMIT") {
            match usize::try_from(limit) {
                Ok(limit) => {
                    config.notifications.recent_limit = limit;
                    // Processed ids must cover the whole polled window.
                    config.notifications.processed_capacity =
                        config.notifications.processed_capacity.max(limit);
                }
                Err(_) => {
                    tracing::warn!(
                        key = "OOO_NOTIFY_RECENT_LIMIT",
                        value = limit,
                        "Value out of range, using default"
                    );
                }
            }
        }

        config
    }
}

/// Parse a positive integer variable. Zero and garbage are ignored.
fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let val = lookup(key)?;
    match val.trim().parse::<u64>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!(key, value = %val, "Invalid value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.match_mode, MatchMode::OneSided);
        assert_eq!(config.notifications.poll_interval, Duration::from_secs(2));
        assert_eq!(config.notifications.recent_window, Duration::from_secs(300));
        assert_eq!(config.notifications.recent_limit, 50);
        assert_eq!(config.notifications.preview_chars, 100);
    }

    #[test]
    fn test_overrides() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("OOO_MATCH_MODE", "Mutual"),
            ("OOO_NOTIFY_POLL_MS", "250"),
            ("OOO_NOTIFY_RECENT_LIMIT", "10"),
        ]));
        assert_eq!(config.match_mode, MatchMode::Mutual);
        assert_eq!(config.notifications.poll_interval, Duration::from_millis(250));
        assert_eq!(config.notifications.recent_limit, 10);
        assert_eq!(config.notifications.processed_capacity, 100);
    }

    #[test]
    fn test_large_recent_limit_raises_processed_capacity() {
        let config = CoreConfig::from_lookup(lookup_from(&[("OOO_NOTIFY_RECENT_LIMIT", "500")]));
        assert_eq!(config.notifications.recent_limit, 500);
        assert_eq!(config.notifications.processed_capacity, 500);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("OOO_MATCH_MODE", "sometimes"),
            ("OOO_NOTIFY_WINDOW_SECS", "0"),
            ("OOO_NOTIFY_POLL_MS", "fast"),
        ]));
        assert_eq!(config.match_mode, MatchMode::OneSided);
        assert_eq!(config.notifications.recent_window, Duration::from_secs(300));
        assert_eq!(config.notifications.poll_interval, Duration::from_secs(2));
    }
}
