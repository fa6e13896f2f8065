use fittrack::{config::log_filter, router, AppState, Config, FitnessTracker, Store};
use tracing::{error, info};
use tracing_subscriber::fmt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let config = Config::from_env();
    let store = Store::open(&config.data_dir).await?;
    let tracker = FitnessTracker::load(store).await;
    info!(
        data_dir = %config.data_dir.display(),
        activities = tracker.activities().len(),
        goals = tracker.goals().len(),
        "loaded fitness data"
    );

    let app = router(AppState::new(tracker));
    let addr = config.socket_addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
