use crate::drivers::ReferenceDb;
use crate::error::Result;
use crate::models::User;

use super::AbstractUsers;

#[async_trait::async_trait]
impl AbstractUsers for ReferenceDb {
    async fn save_user(&self, user: &User) -> Result<()> {
        self.ensure_available()?;
        let mut users = self.users.lock().await;
        let mut user = user.clone();
        user.email = user.email.to_lowercase();
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn fetch_user(&self, id: &str) -> Result<Option<User>> {
        self.ensure_available()?;
        let users = self.users.lock().await;
        Ok(users.get(id).cloned())
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.ensure_available()?;
        let email = email.to_lowercase();
        let users = self.users.lock().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }
}
