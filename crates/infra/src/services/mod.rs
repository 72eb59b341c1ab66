mod notifier;

pub use notifier::{
    create_notifier, render_reminder_mail, INotifier, LogNotifier, SmtpMailer, WebhookNotifier,
    WEBHOOK_KEY_HEADER,
};
