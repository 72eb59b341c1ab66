use anyhow::anyhow;
use reminder_service_domain::{CalendarEvent, PendingEvent, ID};
use reminder_service_infra::{
    Config, IEventRepo, INotifier, InMemoryEventRepo, ReminderContext, Repos, StaticTimeSys,
};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

/// 2021-07-08T14:30:00Z
pub const NOW: i64 = 1625754600000;

pub fn pending_event(id: i64, destination: &str, occurs_at: i64) -> PendingEvent {
    PendingEvent {
        event_id: ID::new(id),
        user_id: 1,
        description: format!("Event {}", id),
        occurs_at,
        destination: destination.into(),
        created: NOW - 1000,
    }
}

pub fn calendar_event(id: i64, occurs_at: i64) -> CalendarEvent {
    CalendarEvent {
        id: ID::new(id),
        user_id: 1,
        description: format!("Event {}", id),
        occurs_at,
        destination: format!("user{}@example.com", id),
        created: NOW - 1000,
    }
}

pub fn setup_context(notifier: Arc<StubNotifier>) -> ReminderContext {
    setup_context_with_repo(notifier, Arc::new(InMemoryEventRepo::new()))
}

pub fn setup_context_with_repo(
    notifier: Arc<StubNotifier>,
    events: Arc<dyn IEventRepo>,
) -> ReminderContext {
    ReminderContext {
        repos: Repos { events },
        config: Config::default(),
        sys: Arc::new(StaticTimeSys { timestamp: NOW }),
        notifier,
    }
}

/// Records every delivery and fails for the configured destinations
#[derive(Default)]
pub struct StubNotifier {
    failing_destinations: Vec<String>,
    delivered: Mutex<Vec<PendingEvent>>,
    attempts: AtomicUsize,
    on_deliver: Mutex<Option<Box<dyn Fn() + Send>>>,
}

impl StubNotifier {
    pub fn failing_for(destinations: &[&str]) -> Self {
        Self {
            failing_destinations: destinations.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Runs `hook` inside every delivery
    pub fn on_deliver(&self, hook: Box<dyn Fn() + Send>) {
        *self.on_deliver.lock().unwrap() = Some(hook);
    }

    pub fn delivered(&self) -> Vec<PendingEvent> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl INotifier for StubNotifier {
    async fn deliver(&self, payload: &[u8]) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.on_deliver.lock().unwrap().as_ref() {
            hook();
        }
        let event: PendingEvent = serde_json::from_slice(payload)?;
        if self.failing_destinations.contains(&event.destination) {
            return Err(anyhow!("Mail server rejected {}", event.destination));
        }
        self.delivered.lock().unwrap().push(event);
        Ok(())
    }
}

/// In-memory durable store that records deletes and can be told to fail
pub struct FlakyEventRepo {
    inner: InMemoryEventRepo,
    pub fail_fetch: AtomicBool,
    failing_deletes: Vec<ID>,
    delete_calls: Mutex<Vec<ID>>,
}

impl FlakyEventRepo {
    pub fn new(failing_deletes: &[i64]) -> Self {
        Self {
            inner: InMemoryEventRepo::new(),
            fail_fetch: AtomicBool::new(false),
            failing_deletes: failing_deletes.iter().map(|id| ID::new(*id)).collect(),
            delete_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn delete_calls(&self) -> Vec<ID> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IEventRepo for FlakyEventRepo {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()> {
        self.inner.insert(e).await
    }

    async fn find_expired(&self, now: i64) -> anyhow::Result<Vec<CalendarEvent>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(anyhow!("Connection to the database was lost"));
        }
        self.inner.find_expired(now).await
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<ID> {
        self.delete_calls.lock().unwrap().push(*event_id);
        if self.failing_deletes.contains(event_id) {
            return Err(anyhow!("Deadlock detected while deleting {}", event_id));
        }
        self.inner.delete(event_id).await
    }
}
