//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_requests_total` (counter): dispatched requests by method, status, backend
//! - `lb_request_duration_seconds` (histogram): dispatch latency
//! - `lb_backend_alive` (gauge): 1=alive, 0=dead
//! - `lb_probe_duration_seconds` (histogram): probe latency by backend and class
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::state::HealthClass;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("backend", backend.to_string()),
    ];
    counter!("lb_requests_total", &labels).increment(1);
    histogram!("lb_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_backend_health(backend: &str, alive: bool) {
    gauge!("lb_backend_alive", "backend" => backend.to_string()).set(if alive { 1.0 } else { 0.0 });
}

pub fn record_probe(backend: &str, class: HealthClass, start: Instant) {
    histogram!(
        "lb_probe_duration_seconds",
        "backend" => backend.to_string(),
        "class" => class.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
