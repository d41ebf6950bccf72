use outofoffice_shared::constants::EVENTS_COLLECTION;

use crate::drivers::{get_doc, put_doc, SqliteDb};
use crate::error::Result;
use crate::models::Event;

use super::AbstractEvents;

#[async_trait::async_trait]
impl AbstractEvents for SqliteDb {
    async fn save_event(&self, event: &Event) -> Result<()> {
        self.with_conn(|conn| put_doc(conn, EVENTS_COLLECTION, &event.id, event))
            .await
    }

    async fn fetch_event(&self, id: &str) -> Result<Option<Event>> {
        self.with_conn(|conn| get_doc(conn, EVENTS_COLLECTION, id)).await
    }
}
