use chrono::{DateTime, Utc};
use outofoffice_shared::constants::ENROLLMENTS_COLLECTION;
use outofoffice_shared::types::EnrollmentStatus;

use crate::drivers::{delete_doc, get_doc, put_doc, query_docs, SqliteDb};
use crate::error::Result;
use crate::models::Enrollment;

use super::{newest_first, AbstractEnrollments};

#[async_trait::async_trait]
impl AbstractEnrollments for SqliteDb {
    async fn save_enrollment(&self, enrollment: &Enrollment) -> Result<()> {
        self.with_conn(|conn| put_doc(conn, ENROLLMENTS_COLLECTION, &enrollment.id, enrollment))
            .await
    }

    async fn fetch_enrollment(&self, id: &str) -> Result<Option<Enrollment>> {
        self.with_conn(|conn| get_doc(conn, ENROLLMENTS_COLLECTION, id))
            .await
    }

    async fn delete_enrollment(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| delete_doc(conn, ENROLLMENTS_COLLECTION, id))
            .await
    }

    async fn fetch_enrollments_for_event(&self, event_id: &str) -> Result<Vec<Enrollment>> {
        self.with_conn(|conn| query_docs(conn, ENROLLMENTS_COLLECTION, "eventId", event_id))
            .await
    }

    async fn fetch_enrollments_for_user(&self, user_id: &str) -> Result<Vec<Enrollment>> {
        let mut found: Vec<Enrollment> = self
            .with_conn(|conn| query_docs(conn, ENROLLMENTS_COLLECTION, "userId", user_id))
            .await?;
        newest_first(&mut found);
        Ok(found)
    }

    async fn set_enrollment_status(
        &self,
        id: &str,
        status: EnrollmentStatus,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let Some(mut enrollment) = get_doc::<Enrollment>(&tx, ENROLLMENTS_COLLECTION, id)? else {
                return Ok(false);
            };
            enrollment.status = status;
            enrollment.updated_at = Some(at);
            put_doc(&tx, ENROLLMENTS_COLLECTION, id, &enrollment)?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn user_enrollments_newest_first() {
        let db = SqliteDb::open_in_memory().unwrap();
        let t0 = Utc::now();

        db.save_enrollment(&Enrollment::new("42", "E1", t0)).await.unwrap();
        db.save_enrollment(&Enrollment::new("42", "E2", t0 + Duration::minutes(5)))
            .await
            .unwrap();
        db.save_enrollment(&Enrollment::new("7", "E1", t0)).await.unwrap();

        let mine = db.fetch_enrollments_for_user("42").await.unwrap();
        let events: Vec<&str> = mine.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(events, vec!["E2", "E1"]);

        let e1 = db.fetch_enrollments_for_event("E1").await.unwrap();
        assert_eq!(e1.len(), 2);
    }

    #[tokio::test]
    async fn status_update_and_delete() {
        let db = SqliteDb::open_in_memory().unwrap();
        let now = Utc::now();
        db.save_enrollment(&Enrollment::new("42", "E1", now)).await.unwrap();

        assert!(db
            .set_enrollment_status("42_E1", EnrollmentStatus::Attended, now)
            .await
            .unwrap());
        assert!(!db
            .set_enrollment_status("missing", EnrollmentStatus::Attended, now)
            .await
            .unwrap());

        let got = db.fetch_enrollment("42_E1").await.unwrap().unwrap();
        assert_eq!(got.status, EnrollmentStatus::Attended);
        assert_eq!(got.updated_at, Some(now));

        assert!(db.delete_enrollment("42_E1").await.unwrap());
        assert!(db.fetch_enrollment("42_E1").await.unwrap().is_none());
    }
}
