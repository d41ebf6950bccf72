use crate::error::Result;
use crate::models::User;

mod reference;
mod sqlite;

#[async_trait::async_trait]
pub trait AbstractUsers: Sync + Send {
    /// Insert or overwrite a user. The email is lowercased before writing.
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Fetch a user by id
    async fn fetch_user(&self, id: &str) -> Result<Option<User>>;

    /// Fetch a user by email, compared case-insensitively
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>>;
}
