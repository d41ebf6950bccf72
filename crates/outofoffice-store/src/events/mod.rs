use crate::error::Result;
use crate::models::Event;

mod reference;
mod sqlite;

#[async_trait::async_trait]
pub trait AbstractEvents: Sync + Send {
    /// Insert or overwrite an event
    async fn save_event(&self, event: &Event) -> Result<()>;

    /// Fetch an event by id
    async fn fetch_event(&self, id: &str) -> Result<Option<Event>>;
}
