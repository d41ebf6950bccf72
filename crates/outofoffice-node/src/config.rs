//! Node configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::Context;

/// Node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// SQLite document database to open.
    /// Env: `OOO_DATABASE_PATH`
    /// Default: `outofoffice.db` in the platform data directory.
    pub database_path: Option<PathBuf>,

    /// User whose notifications are watched.
    /// Env: `OOO_USER_ID` (required)
    pub user_id: String,
}

impl NodeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let user_id = lookup("OOO_USER_ID")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .context("OOO_USER_ID must be set to the user to watch")?;

        let database_path = lookup("OOO_DATABASE_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            database_path,
            user_id,
        })
    }
}
