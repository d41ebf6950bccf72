//! Swipe protocol and match derivation.

use chrono::Utc;
use outofoffice_shared::ids;
use outofoffice_shared::types::{MatchMode, SwipeAction};
use outofoffice_store::{Attendee, SwipeRecord};
use tracing::debug;

use crate::{degrade, Client, Result};

impl Client {
    /// Overwrite the last-swipe annotation of an attendee and, when the
    /// swiper is known, record the swipe against them.
    ///
    /// Returns `false` when the attendee is not in the event's list; the
    /// per-user swipe is recorded regardless.
    pub async fn update_attendee_action(
        &self,
        event_id: &str,
        attendee_id: &str,
        action: SwipeAction,
        swiper_id: Option<&str>,
    ) -> Result<bool> {
        let now = Utc::now();
        let annotated = self
            .db
            .annotate_attendee(event_id, attendee_id, action, now)
            .await?;
        if !annotated {
            debug!(event_id, attendee_id, "swiped attendee not in list");
        }

        if let Some(swiper_id) = swiper_id {
            self.track_user_swipe(event_id, swiper_id, attendee_id, action)
                .await?;
        }
        Ok(annotated)
    }

    /// Record `swiper_id`'s current decision on `attendee_id`. A later swipe
    /// on the same attendee replaces the earlier one.
    pub async fn track_user_swipe(
        &self,
        event_id: &str,
        swiper_id: &str,
        attendee_id: &str,
        action: SwipeAction,
    ) -> Result<()> {
        let record = SwipeRecord {
            action,
            swiped_at: Utc::now(),
        };
        self.db
            .record_user_swipe(event_id, swiper_id, attendee_id, record)
            .await?;
        debug!(event_id, swiper_id, attendee_id, ?action, "swipe recorded");
        Ok(())
    }

    /// Whether `user_id` has a decision on every current attendee. An event
    /// without attendees is never complete.
    pub async fn has_completed_swiping(&self, event_id: &str, user_id: &str) -> bool {
        let Some(doc) = degrade(
            self.db.fetch_event_attendees(event_id).await,
            "has_completed_swiping",
        ) else {
            return false;
        };

        if doc.attendees.is_empty() {
            return false;
        }
        let Some(swipes) = doc.swipes_of(user_id) else {
            return false;
        };
        doc.attendees.iter().all(|a| swipes.contains_key(&a.id))
    }

    /// Attendees `user_id` liked. Under [`MatchMode::Mutual`] the attendee
    /// must also have liked `user_id` back.
    pub async fn get_user_matches(&self, event_id: &str, user_id: &str) -> Vec<Attendee> {
        let Some(doc) = degrade(
            self.db.fetch_event_attendees(event_id).await,
            "get_user_matches",
        ) else {
            return Vec::new();
        };

        let own_attendee_id = ids::attendee_id(event_id, user_id);
        let mode = self.config.match_mode;

        doc.attendees
            .iter()
            .filter(|a| doc.likes(user_id, &a.id))
            .filter(|a| match mode {
                MatchMode::OneSided => true,
                MatchMode::Mutual => doc.likes(a.resolved_user_id(), &own_attendee_id),
            })
            .cloned()
            .collect()
    }
}
