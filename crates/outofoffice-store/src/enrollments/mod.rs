use chrono::{DateTime, Utc};
use outofoffice_shared::types::EnrollmentStatus;

use crate::error::Result;
use crate::models::Enrollment;

mod reference;
mod sqlite;

#[async_trait::async_trait]
pub trait AbstractEnrollments: Sync + Send {
    /// Insert or overwrite an enrollment
    async fn save_enrollment(&self, enrollment: &Enrollment) -> Result<()>;

    /// Fetch an enrollment by its `"<userId>_<eventId>"` id
    async fn fetch_enrollment(&self, id: &str) -> Result<Option<Enrollment>>;

    /// Delete an enrollment, returns whether one existed
    async fn delete_enrollment(&self, id: &str) -> Result<bool>;

    /// Enrollments of an event, in insertion order
    async fn fetch_enrollments_for_event(&self, event_id: &str) -> Result<Vec<Enrollment>>;

    /// Enrollments of a user, most recent first
    async fn fetch_enrollments_for_user(&self, user_id: &str) -> Result<Vec<Enrollment>>;

    /// Change the status of an enrollment, returns `false` if it does not exist
    async fn set_enrollment_status(
        &self,
        id: &str,
        status: EnrollmentStatus,
        at: DateTime<Utc>,
    ) -> Result<bool>;
}

pub(crate) fn newest_first(enrollments: &mut [Enrollment]) {
    enrollments.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));
}
