use outofoffice_shared::constants::MESSAGES_COLLECTION;

use crate::drivers::{latest_docs, put_doc, query_docs, SqliteDb};
use crate::error::Result;
use crate::models::Message;

use super::{oldest_first, AbstractMessages};

#[async_trait::async_trait]
impl AbstractMessages for SqliteDb {
    async fn insert_message(&self, message: &Message) -> Result<()> {
        self.with_conn(|conn| put_doc(conn, MESSAGES_COLLECTION, &message.id, message))
            .await
    }

    async fn fetch_chat_messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        let mut found: Vec<Message> = self
            .with_conn(|conn| query_docs(conn, MESSAGES_COLLECTION, "chatId", chat_id))
            .await?;
        oldest_first(&mut found);
        Ok(found)
    }

    async fn count_unread(&self, chat_id: &str, reader_id: &str) -> Result<usize> {
        let found: Vec<Message> = self
            .with_conn(|conn| query_docs(conn, MESSAGES_COLLECTION, "chatId", chat_id))
            .await?;
        Ok(found.iter().filter(|m| m.is_unread_for(reader_id)).count())
    }

    async fn mark_read(&self, chat_id: &str, reader_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let found: Vec<Message> = query_docs(&tx, MESSAGES_COLLECTION, "chatId", chat_id)?;

            let mut changed = 0;
            for mut message in found.into_iter().filter(|m| m.is_unread_for(reader_id)) {
                message.read = true;
                put_doc(&tx, MESSAGES_COLLECTION, &message.id, &message)?;
                changed += 1;
            }

            tx.commit()?;
            Ok(changed)
        })
        .await
    }

    async fn fetch_recent_messages(&self, limit: usize) -> Result<Vec<Message>> {
        self.with_conn(|conn| latest_docs(conn, MESSAGES_COLLECTION, limit))
            .await
    }
}
