//! # outofoffice-core
//!
//! Chat and matching core of the OutOfOffice app.
//!
//! [`Client`] bundles a [`Database`] with a [`CoreConfig`] and exposes the
//! operations the app screens call: attendee refresh and swipes, match
//! derivation, deterministic chat creation, messaging with read tracking,
//! and the reconciled chat list. [`NotificationSession`] watches the message
//! log for one signed-in user.
//!
//! Reads never fail: a store error is logged and replaced by an empty
//! result, so a flaky connection shows an empty list rather than an error
//! screen. Writes return their error to the caller.

pub mod attendees;
pub mod chats;
pub mod config;
pub mod directory;
pub mod inbox;
pub mod messages;
pub mod mock;
pub mod notifications;
pub mod swipes;

mod error;

use std::sync::Arc;

use outofoffice_store::Database;

pub use chats::ChatDetails;
pub use config::{CoreConfig, NotificationConfig};
pub use error::{CoreError, Result};
pub use inbox::{ChatSummary, EventInbox, InboxChat, PendingMatch};
pub use notifications::{Notification, NotificationSession};

/// Handle to the chat and matching core. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    db: Database,
    config: Arc<CoreConfig>,
}

impl Client {
    pub fn new(db: Database, config: CoreConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }
}

/// Collapse a failed read into `T::default()`, logging why.
pub(crate) fn degrade<T: Default>(
    result: outofoffice_store::Result<T>,
    operation: &'static str,
) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(operation, error = %e, "read failed, returning empty result");
        T::default()
    })
}
