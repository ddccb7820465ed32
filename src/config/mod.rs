//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → cli.rs (clap parse)
//!     → BalancerConfig (immutable)
//!     → validation.rs (backend list → URLs, at startup)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built; there is no reload path
//! - All fields have defaults so tests can start from `BalancerConfig::default()`
//! - No configuration file

pub mod cli;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use schema::{BalancerConfig, HealthCheckConfig, ListenerConfig, ObservabilityConfig, Strategy};
pub use validation::ConfigError;
