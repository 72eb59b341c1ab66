pub mod archive_expired_events;

use crate::{job_schedulers::start_archive_sweep_job, shared::usecase::execute};
use archive_expired_events::{ArchiveExpiredEventsUseCase, SweepReport, UseCaseErrors};
use reminder_service_domain::{ArchivedEvent, ReminderKey};
use reminder_service_infra::{KeyedStore, ReminderContext};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Periodically moves expired events from the durable store into an archive.
///
/// The archive is kept in memory for the lifetime of the process only.
/// Nothing reads it back, it is not persisted and it is gone after a restart.
#[derive(Default)]
pub struct ArchivalSweeper {
    archive: Arc<KeyedStore<ReminderKey, ArchivedEvent>>,
}

impl ArchivalSweeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archived_count(&self) -> usize {
        self.archive.len()
    }

    pub fn archived(&self) -> Vec<ArchivedEvent> {
        self.archive
            .snapshot()
            .into_iter()
            .map(|(_, event)| event)
            .collect()
    }

    /// Runs a single sweep right away
    pub async fn sweep(&self, ctx: &ReminderContext) -> Result<SweepReport, UseCaseErrors> {
        let usecase = ArchiveExpiredEventsUseCase {
            archive: &self.archive,
        };
        execute(usecase, ctx).await
    }

    /// Spawns the periodic sweep job which stops when `cancel` is cancelled
    pub fn start(&self, ctx: &ReminderContext, cancel: &CancellationToken) -> JoinHandle<()> {
        start_archive_sweep_job(ctx.clone(), self.archive.clone(), cancel.clone())
    }
}
