use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;
use yomu_config::Config;

pub mod controller;
pub mod events;
pub mod providers;
pub mod state;

use self::controller::AppController;
use self::providers::{NullCapture, NullOcr};
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state = Arc::new(AppState::new(Config::new()));
    let controller = AppController::new(state);

    // Platform capture/OCR backends plug in here; the null providers
    // keep the daemon running without them.
    tracing::warn!("no capture backend configured, detection will be idle");
    let (watcher, mut tasks) = controller
        .spawn_tasks(Arc::new(NullCapture), Arc::new(NullOcr))
        .await;

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("shutdown requested");
        }
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => tracing::warn!("task exited"),
                Some(Ok(Err(e))) => tracing::error!("task failed: {e}"),
                Some(Err(e)) => tracing::error!("task panicked: {e}"),
                None => {}
            }
        }
    }

    watcher.stop();
    controller.shutdown();
    // Give tasks a window to observe the cancellation before aborting
    let drained = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while tasks.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!("tasks did not stop in time, aborting");
    }
    tasks.shutdown().await;

    Ok(())
}
