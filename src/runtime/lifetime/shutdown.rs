use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 等待 Ctrl+C，然后停止后台清理任务
///
/// A sweep interrupted mid-pass is safe: the next pass starts from scratch.
pub async fn listen_for_shutdown(sweeper_task: Option<JoinHandle<()>>) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    if let Some(task) = sweeper_task {
        task.abort();
        info!("Sweeper background task stopped");
    }
}
