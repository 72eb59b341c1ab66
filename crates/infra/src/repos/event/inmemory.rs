use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use anyhow::anyhow;
use reminder_service_domain::{CalendarEvent, ID};

pub struct InMemoryEventRepo {
    calendar_events: std::sync::Mutex<Vec<CalendarEvent>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            calendar_events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryEventRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()> {
        insert(e, &self.calendar_events);
        Ok(())
    }

    async fn find_expired(&self, now: i64) -> anyhow::Result<Vec<CalendarEvent>> {
        Ok(find_by(&self.calendar_events, |event| event.occurs_at <= now))
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<ID> {
        delete(event_id, &self.calendar_events)
            .map(|event| event.id)
            .ok_or_else(|| anyhow!("Event with id: {} was not found", event_id))
    }
}
