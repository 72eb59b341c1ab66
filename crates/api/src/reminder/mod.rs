mod feed;
pub mod ingest_event;
pub mod send_due_reminders;

use crate::{
    job_schedulers::{start_event_ingest_job, start_reminder_scan_job},
    shared::usecase::execute,
};
pub use feed::{EventFeed, FeedError};
use ingest_event::IngestEventUseCase;
use reminder_service_domain::{PendingEvent, ReminderKey};
use reminder_service_infra::{KeyedStore, ReminderContext};
use send_due_reminders::{ScanReport, SendDueRemindersUseCase};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Buffers incoming events and reminds about them when they are about
/// to take place.
///
/// Buffered events only live in memory and are lost when the process stops.
pub struct ReminderScheduler {
    reminders: Arc<KeyedStore<ReminderKey, PendingEvent>>,
    feed: EventFeed,
    feed_receiver: Option<mpsc::Receiver<PendingEvent>>,
}

impl ReminderScheduler {
    pub fn new(feed_capacity: usize) -> Self {
        let (feed, feed_receiver) = EventFeed::channel(feed_capacity);
        Self {
            reminders: Arc::new(KeyedStore::new()),
            feed,
            feed_receiver: Some(feed_receiver),
        }
    }

    pub fn feed(&self) -> EventFeed {
        self.feed.clone()
    }

    pub fn pending(&self) -> Vec<PendingEvent> {
        self.reminders
            .snapshot()
            .into_iter()
            .map(|(_, event)| event)
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.reminders.len()
    }

    pub async fn ingest(&self, event: PendingEvent, ctx: &ReminderContext) {
        let usecase = IngestEventUseCase {
            event,
            reminders: &self.reminders,
        };
        // Ingesting cannot fail
        let _ = execute(usecase, ctx).await;
    }

    /// Runs a single scan right away
    pub async fn scan(&self, ctx: &ReminderContext) -> ScanReport {
        let cancel = CancellationToken::new();
        let usecase = SendDueRemindersUseCase {
            reminders: &self.reminders,
            cancel: &cancel,
        };
        match execute(usecase, ctx).await {
            Ok(report) => report,
            Err(e) => match e {},
        }
    }

    /// Spawns the ingest job consuming the feed and the periodic scan job.
    /// Both stop when `cancel` is cancelled.
    pub fn start(&mut self, ctx: &ReminderContext, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        let feed_receiver = match self.feed_receiver.take() {
            Some(receiver) => receiver,
            None => {
                warn!("Reminder scheduler has already been started");
                return Vec::new();
            }
        };

        vec![
            start_event_ingest_job(
                ctx.clone(),
                self.reminders.clone(),
                feed_receiver,
                cancel.clone(),
            ),
            start_reminder_scan_job(ctx.clone(), self.reminders.clone(), cancel.clone()),
        ]
    }
}
