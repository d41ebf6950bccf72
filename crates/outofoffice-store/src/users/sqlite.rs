use outofoffice_shared::constants::USERS_COLLECTION;

use crate::drivers::{get_doc, put_doc, query_docs, SqliteDb};
use crate::error::Result;
use crate::models::User;

use super::AbstractUsers;

#[async_trait::async_trait]
impl AbstractUsers for SqliteDb {
    async fn save_user(&self, user: &User) -> Result<()> {
        let mut user = user.clone();
        user.email = user.email.to_lowercase();
        self.with_conn(|conn| put_doc(conn, USERS_COLLECTION, &user.id, &user))
            .await
    }

    async fn fetch_user(&self, id: &str) -> Result<Option<User>> {
        self.with_conn(|conn| get_doc(conn, USERS_COLLECTION, id)).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        self.with_conn(|conn| {
            let mut users: Vec<User> = query_docs(conn, USERS_COLLECTION, "email", &email)?;
            Ok(if users.is_empty() {
                None
            } else {
                Some(users.swap_remove(0))
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let db = SqliteDb::open_in_memory().unwrap();
        let user = User {
            id: "42".into(),
            email: "Ana@Example.COM".into(),
            name: "Ana".into(),
            ..Default::default()
        };
        db.save_user(&user).await.unwrap();

        let found = db.fetch_user_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, "42");
        assert_eq!(found.email, "ana@example.com");
        assert!(db.fetch_user("7").await.unwrap().is_none());
    }
}
