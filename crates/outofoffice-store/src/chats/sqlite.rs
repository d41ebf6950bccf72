use chrono::{DateTime, Utc};
use outofoffice_shared::constants::CHATS_COLLECTION;

use crate::drivers::{all_docs, get_doc, insert_doc_if_absent, put_doc, query_docs, SqliteDb};
use crate::error::{Result, StoreError};
use crate::models::Chat;

use super::{apply_summary, AbstractChats, Participant};

#[async_trait::async_trait]
impl AbstractChats for SqliteDb {
    async fn insert_chat_if_absent(&self, chat: &Chat) -> Result<bool> {
        self.with_conn(|conn| insert_doc_if_absent(conn, CHATS_COLLECTION, &chat.id, chat))
            .await
    }

    async fn upsert_chat(&self, chat: &Chat) -> Result<()> {
        self.with_conn(|conn| put_doc(conn, CHATS_COLLECTION, &chat.id, chat))
            .await
    }

    async fn fetch_chat(&self, id: &str) -> Result<Option<Chat>> {
        self.with_conn(|conn| get_doc(conn, CHATS_COLLECTION, id)).await
    }

    async fn fetch_chats_for_participant(
        &self,
        slot: Participant,
        user_id: &str,
    ) -> Result<Vec<Chat>> {
        self.with_conn(|conn| query_docs(conn, CHATS_COLLECTION, slot.field(), user_id))
            .await
    }

    async fn fetch_all_chats(&self) -> Result<Vec<Chat>> {
        self.with_conn(|conn| all_docs(conn, CHATS_COLLECTION)).await
    }

    async fn update_chat_summary(&self, id: &str, text: &str, at: DateTime<Utc>) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut chat: Chat = get_doc(&tx, CHATS_COLLECTION, id)?.ok_or(StoreError::NotFound)?;
            apply_summary(&mut chat, text, at);
            put_doc(&tx, CHATS_COLLECTION, id, &chat)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }
}
