mod archive;
mod job_schedulers;
mod reminder;
mod shared;
#[cfg(test)]
mod test_helpers;

pub use archive::{
    archive_expired_events::{SweepReport, UseCaseErrors as ArchiveErrors},
    ArchivalSweeper,
};
use futures::future::join_all;
pub use reminder::{send_due_reminders::ScanReport, EventFeed, FeedError, ReminderScheduler};
use reminder_service_infra::ReminderContext;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Owns the reminder scheduler and the archival sweeper and the
/// background jobs driving them
pub struct Application {
    context: ReminderContext,
    scheduler: ReminderScheduler,
    sweeper: ArchivalSweeper,
    cancel: CancellationToken,
    jobs: Vec<JoinHandle<()>>,
}

impl Application {
    pub fn new(context: ReminderContext) -> Self {
        let scheduler = ReminderScheduler::new(context.config.event_feed_capacity);
        Self {
            context,
            scheduler,
            sweeper: ArchivalSweeper::new(),
            cancel: CancellationToken::new(),
            jobs: Vec::new(),
        }
    }

    /// Handle for producers of new and updated events
    pub fn feed(&self) -> EventFeed {
        self.scheduler.feed()
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn sweeper(&self) -> &ArchivalSweeper {
        &self.sweeper
    }

    pub fn start(&mut self) {
        if !self.jobs.is_empty() {
            return;
        }
        self.jobs
            .extend(self.scheduler.start(&self.context, &self.cancel));
        self.jobs.push(self.sweeper.start(&self.context, &self.cancel));
        info!(jobs = self.jobs.len(), "Background jobs started");
    }

    /// Stops every background job, letting a running scan or sweep finish
    /// its current item first. Jobs still running after `shutdown_timeout`
    /// are aborted. Pending reminders and the archive are dropped.
    pub async fn shutdown(self) {
        self.cancel.cancel();

        let mut jobs = self.jobs;
        let timeout = self.context.config.shutdown_timeout;
        let joined = tokio::time::timeout(timeout, join_all(jobs.iter_mut())).await;
        match joined {
            Ok(results) => {
                for res in results {
                    if let Err(e) = res {
                        error!("Background job did not stop cleanly: {:?}", e);
                    }
                }
                info!(
                    dropped_reminders = self.scheduler.pending_count(),
                    "Background jobs stopped"
                );
            }
            Err(_) => {
                error!(
                    "Background jobs did not stop within {} seconds, aborting them",
                    timeout.as_secs()
                );
                for job in &jobs {
                    job.abort();
                }
                // Aborted jobs resolve once they have been dropped
                let _ = join_all(jobs).await;
            }
        }
    }
}
