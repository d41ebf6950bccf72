use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::models::{AttendeeDocument, Chat, Enrollment, Event, Message, User};

/// In-memory reference implementation.
///
/// Each collection sits behind its own lock, so a read-modify-write on one
/// document is atomic with respect to other callers of the same collection.
#[derive(Clone, Default)]
pub struct ReferenceDb {
    pub users: Arc<Mutex<HashMap<String, User>>>,
    pub events: Arc<Mutex<HashMap<String, Event>>>,
    pub enrollments: Arc<Mutex<HashMap<String, Enrollment>>>,
    pub event_attendees: Arc<Mutex<HashMap<String, AttendeeDocument>>>,
    pub chats: Arc<Mutex<HashMap<String, Chat>>>,
    /// Append-only log, insertion ordered.
    pub messages: Arc<Mutex<Vec<Message>>>,
    unavailable: Arc<AtomicBool>,
}

impl ReferenceDb {
    /// Make every subsequent operation fail with [`StoreError::Unavailable`]
    /// until switched back, to exercise outage handling.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub(crate) fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("reference store offline".to_string()))
        } else {
            Ok(())
        }
    }
}
