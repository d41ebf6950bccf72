//! Thin wrappers over the user directory, the event catalog and the
//! enrollment store, so callers go through one [`Client`].

use chrono::Utc;
use outofoffice_shared::ids;
use outofoffice_shared::types::EnrollmentStatus;
use outofoffice_store::{Enrollment, Event, User};
use tracing::info;

use crate::{degrade, Client, Result};

impl Client {
    pub async fn get_user_by_id(&self, user_id: &str) -> Option<User> {
        degrade(self.db.fetch_user(user_id).await, "get_user_by_id")
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        degrade(self.db.fetch_user_by_email(email).await, "get_user_by_email")
    }

    /// Store a user, stamping `createdAt` when missing.
    pub async fn create_user(&self, user: &User) -> Result<User> {
        let now = Utc::now();
        let user = User {
            email: user.email.to_lowercase(),
            created_at: user.created_at.or(Some(now)),
            updated_at: Some(now),
            ..user.clone()
        };
        self.db.save_user(&user).await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn save_event(&self, event: &Event) -> Result<()> {
        self.db.save_event(event).await?;
        Ok(())
    }

    pub async fn get_event(&self, event_id: &str) -> Option<Event> {
        degrade(self.db.fetch_event(event_id).await, "get_event")
    }

    /// Enroll a user in an event, recording the event in the catalog too.
    /// Enrolling twice resets the enrollment to `confirmed`.
    pub async fn enroll_user_in_event(&self, user_id: &str, event: &Event) -> Result<Enrollment> {
        self.db.save_event(event).await?;

        let enrollment = Enrollment::new(user_id, &event.id, Utc::now());
        self.db.save_enrollment(&enrollment).await?;
        info!(user_id, event_id = %event.id, "user enrolled");
        Ok(enrollment)
    }

    /// Returns whether the user was enrolled.
    pub async fn unenroll_user_from_event(&self, user_id: &str, event_id: &str) -> Result<bool> {
        let removed = self
            .db
            .delete_enrollment(&ids::enrollment_id(user_id, event_id))
            .await?;
        Ok(removed)
    }

    pub async fn is_user_enrolled(&self, user_id: &str, event_id: &str) -> bool {
        degrade(
            self.db
                .fetch_enrollment(&ids::enrollment_id(user_id, event_id))
                .await,
            "is_user_enrolled",
        )
        .is_some()
    }

    /// Returns `false` when the user is not enrolled.
    pub async fn update_enrollment_status(
        &self,
        user_id: &str,
        event_id: &str,
        status: EnrollmentStatus,
    ) -> Result<bool> {
        let updated = self
            .db
            .set_enrollment_status(&ids::enrollment_id(user_id, event_id), status, Utc::now())
            .await?;
        Ok(updated)
    }

    /// Enrollments of a user, most recent first.
    pub async fn get_user_enrollments(&self, user_id: &str) -> Vec<Enrollment> {
        degrade(
            self.db.fetch_enrollments_for_user(user_id).await,
            "get_user_enrollments",
        )
    }

    pub async fn get_event_enrollments(&self, event_id: &str) -> Vec<Enrollment> {
        degrade(
            self.db.fetch_enrollments_for_event(event_id).await,
            "get_event_enrollments",
        )
    }
}

#[cfg(test)]
mod tests {
    use outofoffice_store::DatabaseInfo;

    use super::*;
    use crate::CoreConfig;

    #[tokio::test]
    async fn enrollment_lifecycle() {
        let db = DatabaseInfo::Reference.connect().await.unwrap();
        let client = Client::new(db, CoreConfig::default());
        let event = Event {
            id: "E1".into(),
            title: "Meetup".into(),
            ..Default::default()
        };

        assert!(!client.is_user_enrolled("42", "E1").await);
        let enrollment = client.enroll_user_in_event("42", &event).await.unwrap();
        assert_eq!(enrollment.id, "42_E1");
        assert!(client.is_user_enrolled("42", "E1").await);
        assert_eq!(client.get_event("E1").await.unwrap().title, "Meetup");

        assert!(client
            .update_enrollment_status("42", "E1", EnrollmentStatus::Attended)
            .await
            .unwrap());
        assert_eq!(
            client.get_user_enrollments("42").await[0].status,
            EnrollmentStatus::Attended
        );
        assert_eq!(client.get_event_enrollments("E1").await.len(), 1);

        assert!(client.unenroll_user_from_event("42", "E1").await.unwrap());
        assert!(!client.unenroll_user_from_event("42", "E1").await.unwrap());
        assert!(!client
            .update_enrollment_status("42", "E1", EnrollmentStatus::Attended)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn users_by_email_ignore_case() {
        let db = DatabaseInfo::Reference.connect().await.unwrap();
        let client = Client::new(db, CoreConfig::default());

        let created = client
            .create_user(&User {
                id: "42".into(),
                email: "Me@Example.com".into(),
                name: "Me".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(created.created_at.is_some());

        let found = client.get_user_by_email("ME@example.COM").await.unwrap();
        assert_eq!(found.id, "42");
        assert!(client.get_user_by_id("7").await.is_none());
    }
}
