use tracing::{subscriber::set_global_default, Subscriber};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Compose multiple layers into a `tracing`'s subscriber.
///
/// Log lines are written to stdout from a dedicated thread through a bounded
/// queue of `queue_capacity` lines. Lines are dropped when the queue is full.
/// The returned guard flushes the queue when dropped and must be held for the
/// lifetime of the process.
pub fn get_subscriber(
    name: String,
    env_filter: String,
    queue_capacity: usize,
) -> (impl Subscriber + Send + Sync, WorkerGuard) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let (writer, guard) = NonBlockingBuilder::default()
        .buffered_lines_limit(queue_capacity)
        .lossy(true)
        .finish(std::io::stdout());
    let formatting_layer = BunyanFormattingLayer::new(name, writer);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);

    (subscriber, guard)
}

/// Register a subscriber as global default to process span data.
///
/// It should only be called once!
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
