use super::INotifier;
use crate::config::WebhookConfig;
use reqwest::{header::CONTENT_TYPE, Client};

pub const WEBHOOK_KEY_HEADER: &str = "reminder-webhook-key";

/// Posts the reminders as json to a webhook
pub struct WebhookNotifier {
    client: Client,
    url: String,
    key: String,
}

impl WebhookNotifier {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            key: config.key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn deliver(&self, payload: &[u8]) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .header(WEBHOOK_KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_vec())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
