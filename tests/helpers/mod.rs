use reminder_service_domain::{CalendarEvent, PendingEvent, ID};
use reminder_service_infra::{
    Config, INotifier, InMemoryEventRepo, ReminderContext, Repos, StaticTimeSys,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

/// 2021-07-08T14:30:00Z
pub const NOW: i64 = 1625754600000;
pub const MINUTE: i64 = 1000 * 60;

pub struct TestApp {
    pub ctx: ReminderContext,
    pub events: Arc<InMemoryEventRepo>,
}

pub fn setup_app(notifier: Arc<dyn INotifier>) -> TestApp {
    let events = Arc::new(InMemoryEventRepo::new());
    let ctx = ReminderContext {
        repos: Repos {
            events: events.clone(),
        },
        config: Config::default(),
        sys: Arc::new(StaticTimeSys { timestamp: NOW }),
        notifier,
    };
    TestApp { ctx, events }
}

pub fn calendar_event(id: i64, description: &str, occurs_at: i64) -> CalendarEvent {
    CalendarEvent {
        id: ID::new(id),
        user_id: 1,
        description: description.into(),
        occurs_at,
        destination: "user@example.com".into(),
        created: NOW - MINUTE,
    }
}

pub fn pending_event(id: i64, description: &str, occurs_at: i64) -> PendingEvent {
    PendingEvent::from(&calendar_event(id, description, occurs_at))
}

/// Notifier keeping every payload it was handed
#[derive(Default)]
pub struct RecordingNotifier {
    payloads: Mutex<Vec<PendingEvent>>,
}

impl RecordingNotifier {
    pub fn delivered(&self) -> Vec<PendingEvent> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl INotifier for RecordingNotifier {
    async fn deliver(&self, payload: &[u8]) -> anyhow::Result<()> {
        let event = serde_json::from_slice(payload)?;
        self.payloads.lock().unwrap().push(event);
        Ok(())
    }
}

/// Notifier taking `delay` for every delivery
pub struct SlowNotifier {
    delay: Duration,
    attempts: AtomicUsize,
}

impl SlowNotifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl INotifier for SlowNotifier {
    async fn deliver(&self, _payload: &[u8]) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
