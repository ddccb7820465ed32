//! OS signal handling.

use std::sync::Arc;

use crate::lifecycle::Shutdown;

/// Trigger `shutdown` on Ctrl+C. Runs as a background task.
pub fn spawn_ctrl_c_handler(shutdown: Arc<Shutdown>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl+C received, shutting down");
                shutdown.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            }
        }
    });
}
