use chrono::Utc;
use outofoffice_shared::ValidationError;
use outofoffice_store::Message;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{degrade, Client, CoreError, Result};

impl Client {
    /// Append a message to a chat and refresh the chat's last-message
    /// preview.
    ///
    /// Blank text is rejected before anything is written, as is a chat id
    /// that does not exist. The message and the preview are two separate
    /// writes: if the second fails the message is stored but the error is
    /// still returned.
    pub async fn send_message(&self, chat_id: &str, sender_id: &str, text: &str) -> Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        if sender_id.is_empty() {
            return Err(ValidationError::EmptyId("senderId").into());
        }

        if self.db.fetch_chat(chat_id).await?.is_none() {
            return Err(CoreError::ChatNotFound(chat_id.to_string()));
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.to_string(),
            sender_id: sender_id.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
            read: false,
        };
        self.db.insert_message(&message).await?;

        if let Err(e) = self
            .db
            .update_chat_summary(chat_id, text, message.timestamp)
            .await
        {
            warn!(chat_id, message_id = %message.id, error = %e, "message stored but chat summary not updated");
            return Err(e.into());
        }

        debug!(chat_id, message_id = %message.id, "message sent");
        Ok(message)
    }

    /// Full history of a chat, oldest first.
    pub async fn get_chat_messages(&self, chat_id: &str) -> Vec<Message> {
        degrade(self.db.fetch_chat_messages(chat_id).await, "get_chat_messages")
    }

    /// Messages in the chat that `user_id` did not send and has not read.
    pub async fn get_unread_message_count(&self, chat_id: &str, user_id: &str) -> usize {
        degrade(
            self.db.count_unread(chat_id, user_id).await,
            "get_unread_message_count",
        )
    }

    /// Mark everything `user_id` received in the chat as read. Returns how
    /// many messages changed; a second call returns 0.
    pub async fn mark_messages_as_read(&self, chat_id: &str, user_id: &str) -> Result<usize> {
        let changed = self.db.mark_read(chat_id, user_id).await?;
        if changed > 0 {
            debug!(chat_id, user_id, changed, "messages marked read");
        }
        Ok(changed)
    }
}
