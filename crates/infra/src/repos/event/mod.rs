mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;
use reminder_service_domain::{CalendarEvent, ID};

/// The durable store holding the `CalendarEvent`s
#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()>;
    /// Every event taking place at or before `now`
    async fn find_expired(&self, now: i64) -> anyhow::Result<Vec<CalendarEvent>>;
    /// Deletes the event and returns the id of the deleted event
    async fn delete(&self, event_id: &ID) -> anyhow::Result<ID>;
}
