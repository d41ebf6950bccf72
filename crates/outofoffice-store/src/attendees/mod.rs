use chrono::{DateTime, Utc};
use outofoffice_shared::types::SwipeAction;

use crate::error::Result;
use crate::models::{Attendee, AttendeeDocument, SwipeRecord};

mod reference;
mod sqlite;

#[async_trait::async_trait]
pub trait AbstractAttendees: Sync + Send {
    /// Fetch the attendee document of an event
    async fn fetch_event_attendees(&self, event_id: &str) -> Result<Option<AttendeeDocument>>;

    /// Overwrite the attendee list of an event, creating the document if
    /// needed. Recorded swipes and `createdAt` are preserved.
    async fn replace_event_attendees(
        &self,
        event_id: &str,
        event_title: &str,
        attendees: &[Attendee],
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Remove the attendee document of an event
    async fn clear_event_attendees(&self, event_id: &str) -> Result<()>;

    /// Set the last-swipe annotation of one attendee. Returns `false` when
    /// either the document or the attendee does not exist.
    async fn annotate_attendee(
        &self,
        event_id: &str,
        attendee_id: &str,
        action: SwipeAction,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// Upsert the decision of `swiper_id` on `attendee_id`. The document is
    /// created empty when the event has none yet.
    async fn record_user_swipe(
        &self,
        event_id: &str,
        swiper_id: &str,
        attendee_id: &str,
        record: SwipeRecord,
    ) -> Result<()>;
}
