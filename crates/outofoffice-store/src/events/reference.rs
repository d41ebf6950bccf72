use crate::drivers::ReferenceDb;
use crate::error::Result;
use crate::models::Event;

use super::AbstractEvents;

#[async_trait::async_trait]
impl AbstractEvents for ReferenceDb {
    async fn save_event(&self, event: &Event) -> Result<()> {
        self.ensure_available()?;
        let mut events = self.events.lock().await;
        events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn fetch_event(&self, id: &str) -> Result<Option<Event>> {
        self.ensure_available()?;
        let events = self.events.lock().await;
        Ok(events.get(id).cloned())
    }
}
