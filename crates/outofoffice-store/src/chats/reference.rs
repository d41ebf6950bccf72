use chrono::{DateTime, Utc};

use crate::drivers::ReferenceDb;
use crate::error::{Result, StoreError};
use crate::models::Chat;

use super::{apply_summary, AbstractChats, Participant};

#[async_trait::async_trait]
impl AbstractChats for ReferenceDb {
    async fn insert_chat_if_absent(&self, chat: &Chat) -> Result<bool> {
        self.ensure_available()?;
        let mut chats = self.chats.lock().await;
        if chats.contains_key(&chat.id) {
            Ok(false)
        } else {
            chats.insert(chat.id.clone(), chat.clone());
            Ok(true)
        }
    }

    async fn upsert_chat(&self, chat: &Chat) -> Result<()> {
        self.ensure_available()?;
        let mut chats = self.chats.lock().await;
        chats.insert(chat.id.clone(), chat.clone());
        Ok(())
    }

    async fn fetch_chat(&self, id: &str) -> Result<Option<Chat>> {
        self.ensure_available()?;
        let chats = self.chats.lock().await;
        Ok(chats.get(id).cloned())
    }

    async fn fetch_chats_for_participant(
        &self,
        slot: Participant,
        user_id: &str,
    ) -> Result<Vec<Chat>> {
        self.ensure_available()?;
        let chats = self.chats.lock().await;
        Ok(chats
            .values()
            .filter(|chat| slot.of(chat) == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_all_chats(&self) -> Result<Vec<Chat>> {
        self.ensure_available()?;
        let chats = self.chats.lock().await;
        Ok(chats.values().cloned().collect())
    }

    async fn update_chat_summary(&self, id: &str, text: &str, at: DateTime<Utc>) -> Result<()> {
        self.ensure_available()?;
        let mut chats = self.chats.lock().await;
        let chat = chats.get_mut(id).ok_or(StoreError::NotFound)?;
        apply_summary(chat, text, at);
        Ok(())
    }
}
