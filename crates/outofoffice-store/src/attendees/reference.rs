use chrono::{DateTime, Utc};
use outofoffice_shared::types::SwipeAction;

use crate::drivers::ReferenceDb;
use crate::error::Result;
use crate::models::{Attendee, AttendeeDocument, SwipeRecord};

use super::AbstractAttendees;

#[async_trait::async_trait]
impl AbstractAttendees for ReferenceDb {
    async fn fetch_event_attendees(&self, event_id: &str) -> Result<Option<AttendeeDocument>> {
        self.ensure_available()?;
        let docs = self.event_attendees.lock().await;
        Ok(docs.get(event_id).cloned())
    }

    async fn replace_event_attendees(
        &self,
        event_id: &str,
        event_title: &str,
        attendees: &[Attendee],
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_available()?;
        let mut docs = self.event_attendees.lock().await;
        docs.entry(event_id.to_string())
            .or_insert_with(|| AttendeeDocument::new(event_id, event_title, now))
            .replace_attendees(event_title, attendees, now);
        Ok(())
    }

    async fn clear_event_attendees(&self, event_id: &str) -> Result<()> {
        self.ensure_available()?;
        let mut docs = self.event_attendees.lock().await;
        docs.remove(event_id);
        Ok(())
    }

    async fn annotate_attendee(
        &self,
        event_id: &str,
        attendee_id: &str,
        action: SwipeAction,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.ensure_available()?;
        let mut docs = self.event_attendees.lock().await;
        Ok(docs
            .get_mut(event_id)
            .is_some_and(|doc| doc.annotate(attendee_id, action, now)))
    }

    async fn record_user_swipe(
        &self,
        event_id: &str,
        swiper_id: &str,
        attendee_id: &str,
        record: SwipeRecord,
    ) -> Result<()> {
        self.ensure_available()?;
        let mut docs = self.event_attendees.lock().await;
        docs.entry(event_id.to_string())
            .or_insert_with(|| AttendeeDocument::new(event_id, "", record.swiped_at))
            .record_swipe(swiper_id, attendee_id, record);
        Ok(())
    }
}
