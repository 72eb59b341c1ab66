use super::INotifier;
use crate::config::SmtpConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use reminder_service_domain::PendingEvent;

/// Sends reminder mails through an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();
        let from = config.from.parse::<Mailbox>()?;

        Ok(Self { transport, from })
    }
}

/// Subject and body of the mail reminding about the event
pub fn render_reminder_mail(event: &PendingEvent) -> (String, String) {
    let subject = "Notifying about event".to_string();
    let body = format!("You have event planned in an hour: {}\r\n", event.description);
    (subject, body)
}

#[async_trait::async_trait]
impl INotifier for SmtpMailer {
    async fn deliver(&self, payload: &[u8]) -> anyhow::Result<()> {
        let event: PendingEvent = serde_json::from_slice(payload)?;
        let (subject, body) = render_reminder_mail(&event);
        let message = Message::builder()
            .from(self.from.clone())
            .to(event.destination.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}
