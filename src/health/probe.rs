//! Single-backend liveness probe.
//!
//! # Responsibilities
//! - Issue one bounded-timeout GET to a backend's base URL
//! - Measure the time to the response head
//! - Grade the result into a `HealthClass`

use axum::body::Body;
use axum::http::{header, Request, Uri};
use std::time::{Duration, Instant};
use tokio::time;
use url::Url;

use crate::config::HealthCheckConfig;
use crate::health::state::{HealthClass, ProbeThresholds};
use crate::http::forward::UpstreamClient;
use crate::observability::metrics;

const PROBE_USER_AGENT: &str = "health-lb-probe";

/// Classifies backends by probing them.
#[derive(Debug, Clone)]
pub struct Prober {
    client: UpstreamClient,
    timeout: Duration,
    thresholds: ProbeThresholds,
}

impl Prober {
    pub fn new(client: UpstreamClient, config: &HealthCheckConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            thresholds: ProbeThresholds::from(config),
        }
    }

    /// Override the probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe `address` once. Never retries; every failure is `Bad`.
    pub async fn classify(&self, address: &Url) -> HealthClass {
        let uri: Uri = match address.as_str().parse() {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(backend = %address, error = %e, "Health probe failed: invalid uri");
                return HealthClass::Bad;
            }
        };

        let request = match Request::get(uri)
            .header(header::USER_AGENT, PROBE_USER_AGENT)
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(backend = %address, error = %e, "Failed to build health probe request");
                return HealthClass::Bad;
            }
        };

        let start = Instant::now();
        let class = match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let latency = start.elapsed();
                let class = self.thresholds.classify(latency);
                tracing::debug!(
                    backend = %address,
                    status = %response.status(),
                    latency_ms = latency.as_millis() as u64,
                    class = %class,
                    "Health probe answered"
                );
                class
            }
            Ok(Err(e)) => {
                tracing::warn!(backend = %address, error = %e, "Health probe failed: connection error");
                HealthClass::Bad
            }
            Err(_) => {
                tracing::warn!(backend = %address, timeout = ?self.timeout, "Health probe failed: timeout");
                HealthClass::Bad
            }
        };

        metrics::record_probe(address.as_str(), class, start);
        class
    }
}
