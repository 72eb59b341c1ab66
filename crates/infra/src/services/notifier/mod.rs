mod logger;
mod smtp;
mod webhook;

use crate::config::NotifierConfig;
pub use logger::LogNotifier;
pub use smtp::{render_reminder_mail, SmtpMailer};
use std::sync::Arc;
pub use webhook::{WebhookNotifier, WEBHOOK_KEY_HEADER};

/// Delivers a serialized `PendingEvent` to its destination.
///
/// Every call is a single delivery attempt. Retrying is up to the caller.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn deliver(&self, payload: &[u8]) -> anyhow::Result<()>;
}

pub fn create_notifier(config: &NotifierConfig) -> anyhow::Result<Arc<dyn INotifier>> {
    let notifier: Arc<dyn INotifier> = match config {
        NotifierConfig::Smtp(smtp) => Arc::new(SmtpMailer::new(smtp)?),
        NotifierConfig::Webhook(webhook) => Arc::new(WebhookNotifier::new(webhook)?),
        NotifierConfig::Log => Arc::new(LogNotifier {}),
    };
    Ok(notifier)
}
