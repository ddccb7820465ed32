//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatcher as the only handler
//! - Wire up middleware (tracing, request ID)
//! - Start the health monitor next to the listener
//! - Select a backend per request and forward, or answer 503

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::BalancerConfig;
use crate::health::HealthMonitor;
use crate::http::forward::UpstreamClient;
use crate::http::request::{request_id, MakeUuidRequestId, X_REQUEST_ID};
use crate::lifecycle::shutdown::stopped;
use crate::load_balancer::ServerPool;
use crate::observability::metrics;

/// Body returned when no backend is alive.
pub const NO_BACKEND_BODY: &str = "Service not available";
/// Body returned when the selected backend cannot be reached.
pub const BAD_GATEWAY_BODY: &str = "Bad gateway";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<ServerPool>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    pool: Arc<ServerPool>,
    client: UpstreamClient,
}

impl HttpServer {
    /// Create a server dispatching to `pool`.
    pub fn new(config: BalancerConfig, pool: Arc<ServerPool>, client: UpstreamClient) -> Self {
        let router = build_router(AppState { pool: pool.clone() });
        Self {
            router,
            config,
            pool,
            client,
        }
    }

    /// Run the server until `shutdown` fires.
    ///
    /// The health monitor is spawned first so the provisional liveness flags
    /// are corrected as early as possible.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.pool.len(),
            "Load balancer started"
        );

        let monitor = HealthMonitor::new(
            self.pool.clone(),
            self.client.clone(),
            &self.config.health_check,
        );
        let monitor_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            monitor.run(monitor_shutdown).await;
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Every request, asterisk-form targets included, reaches the dispatcher.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeUuidRequestId))
}

/// Dispatcher: select an alive backend and forward the request to it.
///
/// No retry against another backend, and a failed forward does not demote
/// the backend; only health sweeps change liveness.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let backend = match state.pool.select_backend() {
        Some(b) => b,
        None => {
            tracing::warn!(request_id = %request_id, path = %path, "No healthy backends");
            metrics::record_request(&method, 503, "none", start_time);
            return (StatusCode::SERVICE_UNAVAILABLE, NO_BACKEND_BODY).into_response();
        }
    };

    let backend_addr = backend.address().to_string();
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        backend = %backend_addr,
        "Forwarding request"
    );

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    match backend.forwarder().send(request, peer).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), &backend_addr, start_time);
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                backend = %backend_addr,
                error = %e,
                "Upstream error"
            );
            metrics::record_request(&method, 502, &backend_addr, start_time);
            (StatusCode::BAD_GATEWAY, BAD_GATEWAY_BODY).into_response()
        }
    }
}

async fn wait_for(rx: broadcast::Receiver<()>) {
    stopped(rx).await;
    tracing::info!("Shutdown signal received");
}
