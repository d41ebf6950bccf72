use crate::drivers::ReferenceDb;
use crate::error::Result;
use crate::models::Message;

use super::{oldest_first, AbstractMessages};

#[async_trait::async_trait]
impl AbstractMessages for ReferenceDb {
    async fn insert_message(&self, message: &Message) -> Result<()> {
        self.ensure_available()?;
        let mut messages = self.messages.lock().await;
        messages.push(message.clone());
        Ok(())
    }

    async fn fetch_chat_messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        self.ensure_available()?;
        let messages = self.messages.lock().await;
        let mut found: Vec<Message> = messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        oldest_first(&mut found);
        Ok(found)
    }

    async fn count_unread(&self, chat_id: &str, reader_id: &str) -> Result<usize> {
        self.ensure_available()?;
        let messages = self.messages.lock().await;
        Ok(messages
            .iter()
            .filter(|m| m.chat_id == chat_id && m.is_unread_for(reader_id))
            .count())
    }

    async fn mark_read(&self, chat_id: &str, reader_id: &str) -> Result<usize> {
        self.ensure_available()?;
        let mut messages = self.messages.lock().await;
        let mut changed = 0;
        for message in messages
            .iter_mut()
            .filter(|m| m.chat_id == chat_id && m.is_unread_for(reader_id))
        {
            message.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn fetch_recent_messages(&self, limit: usize) -> Result<Vec<Message>> {
        self.ensure_available()?;
        let messages = self.messages.lock().await;
        Ok(messages.iter().rev().take(limit).cloned().collect())
    }
}
