use chrono::{DateTime, Utc};
use outofoffice_shared::constants::ATTENDEES_COLLECTION;
use outofoffice_shared::types::SwipeAction;

use crate::drivers::{delete_doc, get_doc, put_doc, SqliteDb};
use crate::error::Result;
use crate::models::{Attendee, AttendeeDocument, SwipeRecord};

use super::AbstractAttendees;

#[async_trait::async_trait]
impl AbstractAttendees for SqliteDb {
    async fn fetch_event_attendees(&self, event_id: &str) -> Result<Option<AttendeeDocument>> {
        self.with_conn(|conn| get_doc(conn, ATTENDEES_COLLECTION, event_id))
            .await
    }

    async fn replace_event_attendees(
        &self,
        event_id: &str,
        event_title: &str,
        attendees: &[Attendee],
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut doc = get_doc::<AttendeeDocument>(&tx, ATTENDEES_COLLECTION, event_id)?
                .unwrap_or_else(|| AttendeeDocument::new(event_id, event_title, now));
            doc.replace_attendees(event_title, attendees, now);
            put_doc(&tx, ATTENDEES_COLLECTION, event_id, &doc)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn clear_event_attendees(&self, event_id: &str) -> Result<()> {
        self.with_conn(|conn| delete_doc(conn, ATTENDEES_COLLECTION, event_id).map(|_| ()))
            .await
    }

    async fn annotate_attendee(
        &self,
        event_id: &str,
        attendee_id: &str,
        action: SwipeAction,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let Some(mut doc) = get_doc::<AttendeeDocument>(&tx, ATTENDEES_COLLECTION, event_id)?
            else {
                return Ok(false);
            };
            if !doc.annotate(attendee_id, action, now) {
                return Ok(false);
            }
            put_doc(&tx, ATTENDEES_COLLECTION, event_id, &doc)?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }

    async fn record_user_swipe(
        &self,
        event_id: &str,
        swiper_id: &str,
        attendee_id: &str,
        record: SwipeRecord,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut doc = get_doc::<AttendeeDocument>(&tx, ATTENDEES_COLLECTION, event_id)?
                .unwrap_or_else(|| AttendeeDocument::new(event_id, "", record.swiped_at));
            doc.record_swipe(swiper_id, attendee_id, record);
            put_doc(&tx, ATTENDEES_COLLECTION, event_id, &doc)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn attendee(event_id: &str, user_id: &str) -> Attendee {
        Attendee::from_user(
            event_id,
            &User {
                id: user_id.into(),
                name: format!("user {user_id}"),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn replace_keeps_swipes() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDb::open_at(&dir.path().join("attendees.db")).unwrap();
        let now = Utc::now();

        db.replace_event_attendees("E1", "Meetup", &[attendee("E1", "7")], now)
            .await
            .unwrap();
        db.record_user_swipe(
            "E1",
            "42",
            "E1_7",
            SwipeRecord { action: SwipeAction::Liked, swiped_at: now },
        )
        .await
        .unwrap();
        assert!(db
            .annotate_attendee("E1", "E1_7", SwipeAction::Liked, now)
            .await
            .unwrap());
        assert!(!db
            .annotate_attendee("E1", "E1_99", SwipeAction::Liked, now)
            .await
            .unwrap());

        db.replace_event_attendees("E1", "Meetup", &[attendee("E1", "7"), attendee("E1", "8")], now)
            .await
            .unwrap();

        let doc = db.fetch_event_attendees("E1").await.unwrap().unwrap();
        assert_eq!(doc.attendees.len(), 2);
        assert!(doc.likes("42", "E1_7"));

        db.clear_event_attendees("E1").await.unwrap();
        assert!(db.fetch_event_attendees("E1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn swipe_creates_document() {
        let db = SqliteDb::open_in_memory().unwrap();
        let now = Utc::now();

        db.record_user_swipe(
            "E2",
            "42",
            "E2_7",
            SwipeRecord { action: SwipeAction::Passed, swiped_at: now },
        )
        .await
        .unwrap();

        let doc = db.fetch_event_attendees("E2").await.unwrap().unwrap();
        assert!(doc.attendees.is_empty());
        assert_eq!(doc.swipes_of("42").map(|s| s.len()), Some(1));
    }
}
