//! Deterministic conversation identity.
//!
//! A chat between two users about one event always has the id
//! `"<low>_<high>_<eventId>"`, so both sides arrive at the same document no
//! matter who opens it first.

use chrono::Utc;
use outofoffice_shared::ids;
use outofoffice_shared::types::EventMeta;
use outofoffice_shared::ValidationError;
use outofoffice_store::{Chat, User};
use serde::Serialize;
use tracing::{debug, info};

use crate::{degrade, Client, Result};

/// A chat seen from one participant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetails {
    #[serde(flatten)]
    pub chat: Chat,
    pub other_user_id: String,
    pub other_user: Option<User>,
}

impl Client {
    /// Return the id of the chat between `user_a` and `user_b` about
    /// `event_id`, creating it on first use.
    ///
    /// Creation is a conditional insert, so concurrent callers never
    /// overwrite each other and all of them get the same id back.
    pub async fn get_or_create_chat(
        &self,
        user_a: &str,
        user_b: &str,
        event_id: &str,
        event: Option<&EventMeta>,
    ) -> Result<String> {
        for (field, value) in [("userId1", user_a), ("userId2", user_b), ("eventId", event_id)] {
            if value.is_empty() {
                return Err(ValidationError::EmptyId(field).into());
            }
        }

        let meta = match event {
            Some(meta) => EventMeta {
                id: event_id.to_string(),
                ..meta.clone()
            },
            None => EventMeta::new(event_id),
        };

        let chat = Chat::new(user_a, user_b, &meta, Utc::now());
        if self.db.insert_chat_if_absent(&chat).await? {
            info!(chat_id = %chat.id, event_id, "created chat");
        } else {
            debug!(chat_id = %chat.id, "chat already exists");
        }
        Ok(chat.id)
    }

    /// The chat plus the other participant, normalized, with their profile
    /// when the directory has one.
    pub async fn get_chat_details(
        &self,
        chat_id: &str,
        current_user_id: &str,
    ) -> Option<ChatDetails> {
        let chat = degrade(self.db.fetch_chat(chat_id).await, "get_chat_details")?;

        let (first, second) = chat.normalized_participants();
        let other_user_id = if first == ids::extract_user_id(current_user_id) {
            second
        } else {
            first
        }
        .to_string();

        let other_user = self.get_user_by_id(&other_user_id).await;
        Some(ChatDetails {
            chat,
            other_user_id,
            other_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use outofoffice_store::DatabaseInfo;

    use super::*;
    use crate::{CoreConfig, CoreError};

    async fn client() -> Client {
        let db = DatabaseInfo::Reference.connect().await.unwrap();
        Client::new(db, CoreConfig::default())
    }

    #[tokio::test]
    async fn chat_id_is_order_independent_and_idempotent() {
        let client = client().await;
        let meta = EventMeta::new("E1").with_title("Meetup").with_image("img.png");

        let a = client
            .get_or_create_chat("42", "7", "E1", Some(&meta))
            .await
            .unwrap();
        let b = client.get_or_create_chat("7", "42", "E1", None).await.unwrap();
        let c = client.get_or_create_chat("42", "7", "E1", None).await.unwrap();

        assert_eq!(a, "42_7_E1");
        assert_eq!(a, b);
        assert_eq!(b, c);

        let all = client.database().fetch_all_chats().await.unwrap();
        assert_eq!(all.len(), 1);
        // The first creation wins; later calls do not overwrite the snapshot.
        assert_eq!(all[0].event_title, "Meetup");
        assert_eq!(all[0].event_image, "img.png");
    }

    #[tokio::test]
    async fn defaults_without_event_meta() {
        let client = client().await;
        let id = client.get_or_create_chat("1", "2", "E5", None).await.unwrap();

        let chat = client.database().fetch_chat(&id).await.unwrap().unwrap();
        assert_eq!(chat.event_title, "Event");
        assert_eq!(chat.event_image, "");
        assert!(chat.last_message.is_none());
        assert!(chat.last_message_at.is_none());
    }

    #[tokio::test]
    async fn concurrent_creation_yields_one_chat() {
        let client = client().await;

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move {
                    let (a, b) = if i % 2 == 0 { ("42", "7") } else { ("7", "42") };
                    client.get_or_create_chat(a, b, "E1", None).await.unwrap()
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), "42_7_E1");
        }
        assert_eq!(client.database().fetch_all_chats().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_ids_are_rejected() {
        let client = client().await;
        let err = client.get_or_create_chat("", "7", "E1", None).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EmptyId("userId1"))
        ));
        assert!(client.database().fetch_all_chats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn details_resolve_other_user() {
        let client = client().await;
        client
            .create_user(&User {
                id: "7".into(),
                email: "ana@example.com".into(),
                name: "Ana".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = client.get_or_create_chat("42", "7", "E1", None).await.unwrap();

        let details = client.get_chat_details(&id, "42").await.unwrap();
        assert_eq!(details.other_user_id, "7");
        assert_eq!(details.other_user.unwrap().name, "Ana");

        assert!(client.get_chat_details("missing", "42").await.is_none());
    }
}
