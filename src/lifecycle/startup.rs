//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate the backend list and build the pool
//! - Bind the listener
//! - Start optional side tasks (metrics, geo report)
//! - Hand over to the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing binds before the configuration is known to be valid

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{BalancerConfig, ConfigError};
use crate::geo;
use crate::http::{upstream_client, HttpServer};
use crate::lifecycle::Shutdown;
use crate::load_balancer::ServerPool;
use crate::observability::metrics;

/// Errors that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the pool and bind the listener. Nothing is served yet.
pub async fn prepare(
    config: &BalancerConfig,
) -> Result<(Arc<ServerPool>, TcpListener), StartupError> {
    let client = upstream_client();
    let pool = ServerPool::from_addresses(&config.backends, client, config.strategy)?;

    tracing::info!(
        backends = ?config.backends,
        strategy = ?config.strategy,
        "Load balancing across the following backends"
    );

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((Arc::new(pool), listener))
}

/// Run the balancer until `shutdown` fires.
pub async fn run(config: BalancerConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let (pool, listener) = prepare(&config).await?;

    if let Some(raw) = &config.observability.metrics_address {
        match raw.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => {
                tracing::error!(metrics_address = %raw, error = %e, "Failed to parse metrics address");
            }
        }
    }

    if config.geo_report {
        let addresses = pool.backends().iter().map(|b| b.address().clone()).collect();
        tokio::spawn(geo::report(addresses));
    }

    let server = HttpServer::new(config, pool, upstream_client());
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
