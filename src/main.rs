mod telemetry;

use reminder_service_api::Application;
use reminder_service_infra::{get_log_queue_capacity, setup_context};
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let (subscriber, _log_guard) = get_subscriber(
        "reminder_service".into(),
        "info".into(),
        get_log_queue_capacity(),
    );
    init_subscriber(subscriber)?;

    let context = setup_context().await?;

    let mut app = Application::new(context);
    app.start();

    shutdown_signal().await?;
    info!("Shutdown signal received");
    app.shutdown().await;

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
