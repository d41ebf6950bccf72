//! Attendee lists and the refresh policy that keeps them in line with
//! enrollments.

use std::collections::HashSet;

use chrono::Utc;
use outofoffice_shared::constants::{DEFAULT_ATTENDEE_NAME, DEFAULT_EVENT_TITLE};
use outofoffice_shared::ids;
use outofoffice_store::{Attendee, User};
use tracing::{debug, info};

use crate::{degrade, mock, Client, Result};

impl Client {
    /// The stored attendee list of an event. Empty when nothing is stored or
    /// the store cannot be read.
    pub async fn get_event_attendees(&self, event_id: &str) -> Vec<Attendee> {
        degrade(
            self.db.fetch_event_attendees(event_id).await,
            "get_event_attendees",
        )
        .map(|doc| doc.attendees)
        .unwrap_or_default()
    }

    /// Refresh and return the attendee list of an event.
    ///
    /// Real attendees are rebuilt from enrollments on every call and replace
    /// whatever was stored. Without enrollments, stored real attendees are
    /// kept; stored placeholders are kept only when `use_mock` is set and
    /// purged otherwise. An event with nothing stored gets the placeholder
    /// set when `use_mock` is set.
    pub async fn initialize_event_attendees(
        &self,
        event_id: &str,
        event_title: &str,
        current_user_id: Option<&str>,
        use_mock: bool,
    ) -> Result<Vec<Attendee>> {
        let real = self.materialize_attendees(event_id, current_user_id).await;
        if !real.is_empty() {
            info!(event_id, count = real.len(), "refreshing attendees from enrollments");
            self.db
                .replace_event_attendees(event_id, event_title, &real, Utc::now())
                .await?;
            return Ok(real);
        }

        let stored = self.get_event_attendees(event_id).await;
        if !stored.is_empty() {
            if stored.iter().all(Attendee::is_placeholder) {
                if use_mock {
                    return Ok(stored);
                }
                info!(event_id, count = stored.len(), "purging placeholder attendees");
                self.db.clear_event_attendees(event_id).await?;
                return Ok(Vec::new());
            }
            return Ok(stored);
        }

        if use_mock {
            let placeholders = mock::placeholder_attendees(event_id);
            debug!(event_id, "seeding placeholder attendees");
            self.db
                .replace_event_attendees(event_id, event_title, &placeholders, Utc::now())
                .await?;
            return Ok(placeholders);
        }

        Ok(Vec::new())
    }

    /// One attendee per enrolled user, in enrollment order, without the
    /// viewing user.
    async fn materialize_attendees(
        &self,
        event_id: &str,
        current_user_id: Option<&str>,
    ) -> Vec<Attendee> {
        let enrollments = degrade(
            self.db.fetch_enrollments_for_event(event_id).await,
            "fetch_enrollments_for_event",
        );

        let mut seen = HashSet::new();
        let mut attendees = Vec::new();
        for enrollment in enrollments {
            let user_id = enrollment.user_id;
            if Some(user_id.as_str()) == current_user_id || !seen.insert(user_id.clone()) {
                continue;
            }

            let user = degrade(self.db.fetch_user(&user_id).await, "fetch_user").unwrap_or_else(|| {
                debug!(event_id, %user_id, "enrolled user has no profile");
                User {
                    id: user_id.clone(),
                    name: DEFAULT_ATTENDEE_NAME.to_string(),
                    ..Default::default()
                }
            });
            attendees.push(Attendee::from_user(event_id, &user));
        }
        attendees
    }

    /// Overwrite the attendee list, keeping recorded swipes.
    pub async fn store_event_attendees(
        &self,
        event_id: &str,
        attendees: &[Attendee],
        event_title: Option<&str>,
    ) -> Result<()> {
        let title = event_title.unwrap_or(DEFAULT_EVENT_TITLE);
        self.db
            .replace_event_attendees(event_id, title, attendees, Utc::now())
            .await?;
        Ok(())
    }

    /// Append `draft` to the attendee list under a fresh composite id.
    pub async fn add_attendee(&self, event_id: &str, draft: Attendee) -> Result<Attendee> {
        let now = Utc::now();
        let doc = degrade(
            self.db.fetch_event_attendees(event_id).await,
            "fetch_event_attendees",
        );
        let (title, mut attendees) = match doc {
            Some(doc) => (doc.event_title, doc.attendees),
            None => (DEFAULT_EVENT_TITLE.to_string(), Vec::new()),
        };

        // Millisecond suffixes are too long to be read back as a user id.
        let mut stamp = now.timestamp_millis();
        let mut id = ids::attendee_id(event_id, &stamp.to_string());
        while attendees.iter().any(|a| a.id == id) {
            stamp += 1;
            id = ids::attendee_id(event_id, &stamp.to_string());
        }

        let attendee = Attendee {
            id,
            event_id: event_id.to_string(),
            ..draft
        };
        attendees.push(attendee.clone());

        self.db
            .replace_event_attendees(event_id, &title, &attendees, now)
            .await?;
        Ok(attendee)
    }

    pub async fn get_attendee_count(&self, event_id: &str) -> usize {
        self.get_event_attendees(event_id).await.len()
    }

    /// Empty the attendee list. Recorded swipes stay.
    pub async fn clear_all_attendees(&self, event_id: &str) -> Result<()> {
        let title = degrade(
            self.db.fetch_event_attendees(event_id).await,
            "fetch_event_attendees",
        )
        .map(|doc| doc.event_title)
        .unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string());

        self.db
            .replace_event_attendees(event_id, &title, &[], Utc::now())
            .await?;
        Ok(())
    }
}
