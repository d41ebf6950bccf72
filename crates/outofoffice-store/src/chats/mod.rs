use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Chat;

mod reference;
mod sqlite;

/// Which participant slot of a chat to match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    First,
    Second,
}

impl Participant {
    /// Stored field name of the slot.
    pub fn field(self) -> &'static str {
        match self {
            Participant::First => "userId1",
            Participant::Second => "userId2",
        }
    }

    pub fn of(self, chat: &Chat) -> &str {
        match self {
            Participant::First => &chat.user_id1,
            Participant::Second => &chat.user_id2,
        }
    }
}

#[async_trait::async_trait]
pub trait AbstractChats: Sync + Send {
    /// Insert a chat only if no chat with the same id exists.
    /// Returns whether this call created it.
    async fn insert_chat_if_absent(&self, chat: &Chat) -> Result<bool>;

    /// Insert or overwrite a chat
    async fn upsert_chat(&self, chat: &Chat) -> Result<()>;

    /// Fetch a chat by id
    async fn fetch_chat(&self, id: &str) -> Result<Option<Chat>>;

    /// Chats whose stored participant field equals `user_id` exactly
    async fn fetch_chats_for_participant(
        &self,
        slot: Participant,
        user_id: &str,
    ) -> Result<Vec<Chat>>;

    /// Every stored chat
    async fn fetch_all_chats(&self) -> Result<Vec<Chat>>;

    /// Set the last-message preview and bump `updatedAt`.
    /// Fails with `NotFound` when the chat does not exist.
    async fn update_chat_summary(&self, id: &str, text: &str, at: DateTime<Utc>) -> Result<()>;
}

pub(crate) fn apply_summary(chat: &mut Chat, text: &str, at: DateTime<Utc>) {
    chat.last_message = Some(text.to_string());
    chat.last_message_at = Some(at);
    chat.updated_at = at;
}
