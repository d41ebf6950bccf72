use chrono::{DateTime, Utc};
use outofoffice_shared::types::EnrollmentStatus;

use crate::drivers::ReferenceDb;
use crate::error::Result;
use crate::models::Enrollment;

use super::{newest_first, AbstractEnrollments};

#[async_trait::async_trait]
impl AbstractEnrollments for ReferenceDb {
    async fn save_enrollment(&self, enrollment: &Enrollment) -> Result<()> {
        self.ensure_available()?;
        let mut enrollments = self.enrollments.lock().await;
        enrollments.insert(enrollment.id.clone(), enrollment.clone());
        Ok(())
    }

    async fn fetch_enrollment(&self, id: &str) -> Result<Option<Enrollment>> {
        self.ensure_available()?;
        let enrollments = self.enrollments.lock().await;
        Ok(enrollments.get(id).cloned())
    }

    async fn delete_enrollment(&self, id: &str) -> Result<bool> {
        self.ensure_available()?;
        let mut enrollments = self.enrollments.lock().await;
        Ok(enrollments.remove(id).is_some())
    }

    async fn fetch_enrollments_for_event(&self, event_id: &str) -> Result<Vec<Enrollment>> {
        self.ensure_available()?;
        let enrollments = self.enrollments.lock().await;
        let mut found: Vec<Enrollment> = enrollments
            .values()
            .filter(|e| e.event_id == event_id)
            .cloned()
            .collect();
        // HashMap order is arbitrary; enrollment time is the closest stand-in
        // for insertion order.
        found.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn fetch_enrollments_for_user(&self, user_id: &str) -> Result<Vec<Enrollment>> {
        self.ensure_available()?;
        let enrollments = self.enrollments.lock().await;
        let mut found: Vec<Enrollment> = enrollments
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn set_enrollment_status(
        &self,
        id: &str,
        status: EnrollmentStatus,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.ensure_available()?;
        let mut enrollments = self.enrollments.lock().await;
        Ok(match enrollments.get_mut(id) {
            Some(enrollment) => {
                enrollment.status = status;
                enrollment.updated_at = Some(at);
                true
            }
            None => false,
        })
    }
}
