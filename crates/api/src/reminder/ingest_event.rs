use crate::shared::usecase::UseCase;
use reminder_service_domain::{PendingEvent, ReminderKey};
use reminder_service_infra::{KeyedStore, ReminderContext};
use tracing::debug;

/// Buffers a newly created or updated event until its reminder is due
#[derive(Debug)]
pub struct IngestEventUseCase<'a> {
    pub event: PendingEvent,
    pub reminders: &'a KeyedStore<ReminderKey, PendingEvent>,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl<'a> UseCase for IngestEventUseCase<'a> {
    type Response = ();

    type Errors = UseCaseErrors;

    const NAME: &'static str = "IngestEvent";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Errors> {
        let key = self.event.key(ctx.config.key_strategy);
        if let Some(replaced) = self.reminders.put(key.clone(), self.event.clone()) {
            debug!(
                %key,
                replaced_event_id = %replaced.event_id,
                "Pending event replaced an earlier event with the same key"
            );
        }
        Ok(())
    }
}
