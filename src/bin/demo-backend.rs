//! Minimal backend for trying the balancer by hand.
//!
//! ```text
//! demo-backend --port 3200 --name "server 1"
//! health-lb --backends http://localhost:3200,http://localhost:3201
//! ```

use axum::{extract::State, routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "demo-backend")]
#[command(about = "Tiny HTTP server to put behind health-lb", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3200)]
    port: u16,

    /// Name echoed in every response
    #[arg(short, long, default_value = "server 1")]
    name: String,

    /// Artificial latency added to every response, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

struct Demo {
    name: String,
    delay: Duration,
}

async fn hello(State(demo): State<Arc<Demo>>) -> String {
    if !demo.delay.is_zero() {
        tokio::time::sleep(demo.delay).await;
    }
    format!("Hello, that is {} !", demo.name)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let demo = Arc::new(Demo {
        name: cli.name,
        delay: Duration::from_millis(cli.delay_ms),
    });

    let app = Router::new()
        .route("/", get(hello))
        .route("/{*path}", get(hello))
        .with_state(demo);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Demo backend listening");
    axum::serve(listener, app).await?;
    Ok(())
}
