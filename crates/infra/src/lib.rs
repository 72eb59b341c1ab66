mod config;
mod keyed_store;
mod repos;
mod services;
mod system;

pub use config::{
    get_log_queue_capacity, Config, ConfigError, NotifierConfig, SmtpConfig, WebhookConfig,
    ARCHIVE_SWEEP_INTERVAL, REMINDER_HORIZON, REMINDER_SCAN_INTERVAL,
};
pub use keyed_store::{KeyedStore, ScanAction};
pub use repos::{IEventRepo, InMemoryEventRepo, PostgresEventRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

/// Everything the background jobs need to talk to the outside world
#[derive(Clone)]
pub struct ReminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
}

impl ReminderContext {
    /// Context without any external dependencies
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::default(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(LogNotifier {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<ReminderContext> {
    let config = Config::from_env()?;
    let repos = match get_psql_connection_string() {
        Some(connection_string) => Repos::create_postgres(&connection_string).await?,
        None => {
            warn!("DATABASE_URL is not set, expired events are swept from an in-memory store");
            Repos::create_inmemory()
        }
    };
    let notifier = create_notifier(&config.notifier)?;

    Ok(ReminderContext {
        repos,
        config,
        sys: Arc::new(RealSys {}),
        notifier,
    })
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING).ok()
}
