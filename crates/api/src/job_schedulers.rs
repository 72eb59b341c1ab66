use crate::{
    archive::archive_expired_events::ArchiveExpiredEventsUseCase,
    reminder::{ingest_event::IngestEventUseCase, send_due_reminders::SendDueRemindersUseCase},
    shared::usecase::execute,
};
use reminder_service_domain::{ArchivedEvent, PendingEvent, ReminderKey};
use reminder_service_infra::{KeyedStore, ReminderContext};
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span};
use tracing_futures::Instrument;

/// Ticks every `period`, starting one `period` from now. Ticks missed
/// because a run took too long are delayed rather than fired in a burst.
fn periodic_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

pub fn start_event_ingest_job(
    ctx: ReminderContext,
    reminders: Arc<KeyedStore<ReminderKey, PendingEvent>>,
    mut feed: mpsc::Receiver<PendingEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let job = async move {
        info!("Event ingest job started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                event = feed.recv() => match event {
                    Some(event) => {
                        let usecase = IngestEventUseCase {
                            event,
                            reminders: &*reminders,
                        };
                        let _ = execute(usecase, &ctx).await;
                    }
                    None => {
                        info!("Event feed was closed by every producer");
                        break;
                    }
                },
            }
        }
        info!("Event ingest job stopped");
    };
    tokio::spawn(job.instrument(info_span!("background_job", job = "event_ingest")))
}

pub fn start_reminder_scan_job(
    ctx: ReminderContext,
    reminders: Arc<KeyedStore<ReminderKey, PendingEvent>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let job = async move {
        let mut ticker = periodic_ticker(ctx.config.reminder_scan_interval);
        info!("Reminder scan job started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let usecase = SendDueRemindersUseCase {
                        reminders: &*reminders,
                        cancel: &cancel,
                    };
                    if let Ok(report) = execute(usecase, &ctx).await {
                        debug!(?report, pending = reminders.len(), "Reminder scan finished");
                    }
                }
            }
        }
        info!("Reminder scan job stopped");
    };
    tokio::spawn(job.instrument(info_span!("background_job", job = "reminder_scan")))
}

pub fn start_archive_sweep_job(
    ctx: ReminderContext,
    archive: Arc<KeyedStore<ReminderKey, ArchivedEvent>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let job = async move {
        let mut ticker = periodic_ticker(ctx.config.archive_sweep_interval);
        info!("Archive sweep job started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let usecase = ArchiveExpiredEventsUseCase { archive: &*archive };
                    // Failures are logged by `execute`, the next tick retries
                    let _ = execute(usecase, &ctx).await;
                }
            }
        }
        info!("Archive sweep job stopped");
    };
    tokio::spawn(job.instrument(info_span!("background_job", job = "archive_sweep")))
}
