//! health-lb
//!
//! An HTTP load balancer built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                 LOAD BALANCER                  │
//!                         │                                                │
//!     Client Request      │  ┌──────────┐    ┌──────────┐    ┌──────────┐  │
//!     ────────────────────┼─▶│   http   │───▶│ dispatch │───▶│  server  │  │
//!                         │  │  server  │    │          │    │   pool   │  │
//!                         │  └──────────┘    └────┬─────┘    └────▲─────┘  │
//!                         │                       │               │        │
//!                         │                       ▼               │ alive  │
//!     Client Response     │                 ┌──────────┐    ┌─────┴────┐   │
//!     ◀───────────────────┼─────────────────│ forward  │    │  health  │   │
//!                         │                 │ adapter  │    │ monitor  │   │
//!                         │                 └────┬─────┘    └─────┬────┘   │
//!                         └──────────────────────┼────────────────┼────────┘
//!                                                ▼                ▼
//!                                          Backend servers (forward / probe)
//! ```

use clap::Parser;
use std::sync::Arc;

use health_lb::config::Cli;
use health_lb::lifecycle::{signals, startup};
use health_lb::observability::logging;
use health_lb::Shutdown;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();

    logging::init_logging(&config.observability);

    tracing::info!("health-lb v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        config = %serde_json::to_string(&config)?,
        "Configuration loaded"
    );

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_ctrl_c_handler(shutdown.clone());

    if let Err(e) = startup::run(config, &shutdown).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
