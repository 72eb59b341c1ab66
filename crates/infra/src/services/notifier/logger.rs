use super::INotifier;
use tracing::info;

/// Writes the reminders to the log instead of sending them anywhere
pub struct LogNotifier {}

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn deliver(&self, payload: &[u8]) -> anyhow::Result<()> {
        info!(
            reminder = %String::from_utf8_lossy(payload),
            "Reminder delivered to log"
        );
        Ok(())
    }
}
