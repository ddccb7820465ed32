//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the balancer.
//! Built from the command line only; the types derive `Serialize` so the
//! effective configuration can be dumped at startup.

use serde::Serialize;

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Serialize, Default)]
pub struct BalancerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Backend addresses, in the order given on the command line.
    pub backends: Vec<String>,

    /// Backend selection policy.
    pub strategy: Strategy,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Print the geo distance report on startup.
    pub geo_report: bool,
}

/// Listener configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ListenerConfig {
    /// Host to bind.
    pub host: String,

    /// Port the dispatcher listens on.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// How the pool picks among alive backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Uniformly random among the alive subset.
    #[default]
    Random,
    /// Rotating counter over the alive subset.
    RoundRobin,
}

/// Health check configuration.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckConfig {
    /// Pause between two sweeps, in seconds.
    pub interval_secs: u64,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// Latency below which a backend is classified Good, in milliseconds.
    pub good_below_ms: u64,

    /// Latency at or above which a backend is classified Overloaded, in milliseconds.
    pub overloaded_at_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            timeout_secs: 2,
            good_below_ms: 500,
            overloaded_at_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus endpoint bind address. Metrics export is off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
