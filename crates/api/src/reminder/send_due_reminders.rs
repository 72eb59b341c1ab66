use crate::shared::usecase::UseCase;
use reminder_service_domain::{PendingEvent, ReminderKey};
use reminder_service_infra::{KeyedStore, ReminderContext, ScanAction};
use reminder_service_utils::duration_millis;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Sends a reminder for every buffered event taking place within the
/// reminder horizon and forgets the events whose reminder was delivered.
///
/// The due events are copied out before the notifier is called, so
/// ingesting new events never waits for a delivery. An event that is
/// replaced while its reminder is being delivered stays in the buffer.
/// No further deliveries are started once `cancel` is cancelled.
#[derive(Debug)]
pub struct SendDueRemindersUseCase<'a> {
    pub reminders: &'a KeyedStore<ReminderKey, PendingEvent>,
    pub cancel: &'a CancellationToken,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

/// Outcome of one scan over the buffered events
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Events within the reminder horizon
    pub due: usize,
    pub delivered: usize,
    pub failed_serialization: usize,
    pub failed_delivery: usize,
    pub evicted: usize,
}

#[async_trait::async_trait]
impl<'a> UseCase for SendDueRemindersUseCase<'a> {
    type Response = ScanReport;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let horizon = duration_millis(ctx.config.reminder_horizon);

        let due_events = self
            .reminders
            .collect_matching(|_, event| event.is_due(now, horizon));
        let mut report = ScanReport {
            due: due_events.len(),
            ..Default::default()
        };

        let mut delivered = HashMap::new();
        for (position, (key, event)) in due_events.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(
                    undelivered = report.due - position,
                    "Scan cancelled before every due event was delivered"
                );
                break;
            }
            let payload = match serde_json::to_vec(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(%key, error = %e, "Failed to serialize event");
                    report.failed_serialization += 1;
                    continue;
                }
            };

            match ctx.notifier.deliver(&payload).await {
                Ok(()) => {
                    report.delivered += 1;
                    delivered.insert(key, event);
                }
                Err(e) => {
                    warn!(
                        %key,
                        event_id = %event.event_id,
                        error = %e,
                        "Failed to send notification about event"
                    );
                    report.failed_delivery += 1;
                }
            }
        }

        report.evicted = self.reminders.scan_and_mutate(
            |key, event| delivered.get(key) == Some(event),
            |_, _| ScanAction::Evict,
        );

        Ok(report)
    }
}
