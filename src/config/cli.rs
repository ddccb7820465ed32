//! Command line surface.

use clap::{Parser, ValueEnum};

use crate::config::schema::{
    BalancerConfig, HealthCheckConfig, ListenerConfig, ObservabilityConfig, Strategy,
};
use crate::config::validation::split_backend_list;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Random,
    RoundRobin,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Random => Strategy::Random,
            StrategyArg::RoundRobin => Strategy::RoundRobin,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "health-lb")]
#[command(about = "HTTP load balancer with latency based health checks", long_about = None)]
pub struct Cli {
    /// Load balanced backends, use commas to separate
    #[arg(long, default_value = "")]
    pub backends: String,

    /// Port to serve
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Backend selection policy
    #[arg(long, value_enum, default_value = "random")]
    pub strategy: StrategyArg,

    /// Seconds between two health sweeps
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub health_interval_secs: u64,

    /// Health probe timeout in seconds
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_timeout_secs: u64,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Expose Prometheus metrics on this address
    #[arg(long)]
    pub metrics_address: Option<String>,

    /// Print the distance between this host and every backend on startup
    #[arg(long)]
    pub geo_report: bool,
}

impl Cli {
    /// Build the configuration. Backend addresses are validated at startup.
    pub fn into_config(self) -> BalancerConfig {
        BalancerConfig {
            listener: ListenerConfig {
                port: self.port,
                ..ListenerConfig::default()
            },
            backends: split_backend_list(&self.backends),
            strategy: self.strategy.into(),
            health_check: HealthCheckConfig {
                interval_secs: self.health_interval_secs,
                timeout_secs: self.probe_timeout_secs,
                ..HealthCheckConfig::default()
            },
            observability: ObservabilityConfig {
                log_level: self.log_level,
                metrics_address: self.metrics_address,
            },
            geo_report: self.geo_report,
        }
    }
}
