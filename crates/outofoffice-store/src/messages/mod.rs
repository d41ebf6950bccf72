use crate::error::Result;
use crate::models::Message;

mod reference;
mod sqlite;

#[async_trait::async_trait]
pub trait AbstractMessages: Sync + Send {
    /// Append a message
    async fn insert_message(&self, message: &Message) -> Result<()>;

    /// Messages of a chat, oldest first. Equal timestamps keep insertion order.
    async fn fetch_chat_messages(&self, chat_id: &str) -> Result<Vec<Message>>;

    /// Unread messages in a chat that were not sent by `reader_id`
    async fn count_unread(&self, chat_id: &str, reader_id: &str) -> Result<usize>;

    /// Mark every message in a chat not sent by `reader_id` as read.
    /// Returns how many changed.
    async fn mark_read(&self, chat_id: &str, reader_id: &str) -> Result<usize>;

    /// The `limit` most recently inserted messages across all chats, newest first
    async fn fetch_recent_messages(&self, limit: usize) -> Result<Vec<Message>>;
}

pub(crate) fn oldest_first(messages: &mut [Message]) {
    // Stable sort, so ties keep insertion order.
    messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
}
