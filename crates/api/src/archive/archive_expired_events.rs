use crate::shared::usecase::UseCase;
use reminder_service_domain::{ArchivedEvent, ReminderKey};
use reminder_service_infra::{KeyedStore, ReminderContext};
use thiserror::Error;
use tracing::{info, warn};

/// Moves every event that has already taken place out of the durable
/// store and into the in-memory archive.
///
/// Only the archive insert holds the archive lock. The delete from the
/// durable store runs after the lock is released.
#[derive(Debug)]
pub struct ArchiveExpiredEventsUseCase<'a> {
    pub archive: &'a KeyedStore<ReminderKey, ArchivedEvent>,
}

#[derive(Error, Debug)]
pub enum UseCaseErrors {
    #[error("Failed to get events to clean: {0}")]
    FetchExpired(anyhow::Error),
}

/// Outcome of one sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub fetched: usize,
    pub archived: usize,
    pub deleted: usize,
    pub failed_deletes: usize,
}

#[async_trait::async_trait]
impl<'a> UseCase for ArchiveExpiredEventsUseCase<'a> {
    type Response = SweepReport;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "ArchiveExpiredEvents";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let expired_events = ctx
            .repos
            .events
            .find_expired(now)
            .await
            .map_err(UseCaseErrors::FetchExpired)?;

        let mut report = SweepReport {
            fetched: expired_events.len(),
            ..Default::default()
        };
        for event in &expired_events {
            let archived = ArchivedEvent::new(event, now);
            self.archive
                .put(archived.key(ctx.config.key_strategy), archived);
            report.archived += 1;

            match ctx.repos.events.delete(&event.id).await {
                Ok(_) => report.deleted += 1,
                Err(e) => {
                    warn!(event_id = %event.id, error = %e, "Failed to delete event from db");
                    report.failed_deletes += 1;
                }
            }
        }

        info!(
            archived = report.archived,
            deleted = report.deleted,
            archive_size = self.archive.len(),
            "Archived and deleted old events"
        );
        Ok(report)
    }
}
