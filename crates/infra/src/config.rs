use reminder_service_domain::KeyStrategy;
use reminder_service_utils::create_random_secret;
use std::{fmt::Display, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

/// How far ahead of an event the reminder scan looks
pub const REMINDER_HORIZON: Duration = Duration::from_secs(60 * 60);
/// How often the pending reminders are scanned
pub const REMINDER_SCAN_INTERVAL: Duration = Duration::from_secs(60);
/// How often expired events are moved to the archive
pub const ARCHIVE_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24);

const DEFAULT_EVENT_FEED_CAPACITY: usize = 10;
const DEFAULT_LOG_QUEUE_CAPACITY: usize = 10_000;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;
const DEFAULT_NOTIFIER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The `{0}` environment variable is required by the `{1}` notifier")]
    MissingVariable(&'static str, &'static str),
    #[error("Unknown notifier: `{0}`. Expected `smtp`, `webhook` or `log`")]
    UnknownNotifier(String),
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Sender address of the reminder mails
    pub from: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    /// Sent in the `reminder-webhook-key` header so that the receiver
    /// can verify where the request came from
    pub key: String,
    pub timeout: Duration,
}

/// Which transport reminders are delivered through
#[derive(Debug, Clone)]
pub enum NotifierConfig {
    Smtp(SmtpConfig),
    Webhook(WebhookConfig),
    /// Only logs the reminders, useful when running locally
    Log,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Events taking place within this duration from now get a reminder
    pub reminder_horizon: Duration,
    /// Interval between each scan of the pending reminders
    pub reminder_scan_interval: Duration,
    /// Interval between each sweep of expired events into the archive
    pub archive_sweep_interval: Duration,
    /// How pending and archived events are keyed in memory
    pub key_strategy: KeyStrategy,
    /// Size of the bounded queue producers push new events into.
    /// Producers wait for a free slot when it is full.
    pub event_feed_capacity: usize,
    /// Upper bound on the time spent waiting for the background jobs
    /// to stop after shutdown has been requested
    pub shutdown_timeout: Duration,
    pub notifier: NotifierConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let key_strategy = parse_env("REMINDER_KEY_STRATEGY", KeyStrategy::EventId);
        if key_strategy == KeyStrategy::DestinationAndDescription {
            warn!("Events sharing destination and description will overwrite each other");
        }
        Ok(Self {
            key_strategy,
            event_feed_capacity: parse_env("EVENT_FEED_CAPACITY", DEFAULT_EVENT_FEED_CAPACITY),
            shutdown_timeout: Duration::from_secs(parse_env(
                "SHUTDOWN_TIMEOUT_SECS",
                DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            )),
            notifier: NotifierConfig::from_env()?,
            ..Default::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminder_horizon: REMINDER_HORIZON,
            reminder_scan_interval: REMINDER_SCAN_INTERVAL,
            archive_sweep_interval: ARCHIVE_SWEEP_INTERVAL,
            key_strategy: KeyStrategy::default(),
            event_feed_capacity: DEFAULT_EVENT_FEED_CAPACITY,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            notifier: NotifierConfig::Log,
        }
    }
}

impl NotifierConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let kind = std::env::var("NOTIFIER").unwrap_or_else(|_| "log".into());
        let timeout = Duration::from_secs(parse_env(
            "NOTIFIER_TIMEOUT_SECS",
            DEFAULT_NOTIFIER_TIMEOUT_SECS,
        ));
        match kind.trim().to_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp(SmtpConfig {
                host: required_env("SMTP_HOST", "smtp")?,
                port: parse_env("SMTP_PORT", DEFAULT_SMTP_PORT),
                user: required_env("SMTP_USER", "smtp")?,
                password: required_env("SMTP_PASSWORD", "smtp")?,
                from: required_env("SMTP_FROM", "smtp")?,
                timeout,
            })),
            "webhook" => {
                let key = match std::env::var("WEBHOOK_KEY") {
                    Ok(key) => key,
                    Err(_) => {
                        let key = create_random_secret(16);
                        info!(
                            "Did not find WEBHOOK_KEY environment variable. Generated webhook key: {}",
                            key
                        );
                        key
                    }
                };
                Ok(Self::Webhook(WebhookConfig {
                    url: required_env("WEBHOOK_URL", "webhook")?,
                    key,
                    timeout,
                }))
            }
            "log" => Ok(Self::Log),
            _ => Err(ConfigError::UnknownNotifier(kind)),
        }
    }
}

/// Capacity of the queue between log producers and the log writer.
/// Read separately from `Config` because logging is installed first.
pub fn get_log_queue_capacity() -> usize {
    parse_env("LOG_QUEUE_CAPACITY", DEFAULT_LOG_QUEUE_CAPACITY)
}

fn required_env(name: &'static str, notifier: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVariable(name, notifier))
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "The given {}: {} is not valid ({}), falling back to the default: {}.",
                    name, value, e, default
                );
                default
            }
        },
        Err(_) => default,
    }
}
