//! Active health checking.
//!
//! # Responsibilities
//! - Periodically sweep the whole pool
//! - Keep running until shutdown, whatever individual probes do

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::probe::Prober;
use crate::http::forward::UpstreamClient;
use crate::load_balancer::ServerPool;

pub struct HealthMonitor {
    pool: Arc<ServerPool>,
    prober: Prober,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(pool: Arc<ServerPool>, client: UpstreamClient, config: &HealthCheckConfig) -> Self {
        Self {
            pool,
            prober: Prober::new(client, config),
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    /// Replace the sweep interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sweep, sleep, repeat. Returns once `shutdown` fires.
    ///
    /// A sweep in progress is allowed to finish; the signal is observed
    /// during the pause that follows it.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = ?self.interval,
            backends = self.pool.len(),
            "Health monitor starting"
        );

        loop {
            let summary = self.pool.health_sweep(&self.prober).await;
            tracing::debug!(
                alive = summary.alive,
                total = summary.total,
                "Health sweep complete"
            );
            if summary.alive == 0 {
                tracing::warn!(total = summary.total, "No backend is alive");
            }

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
