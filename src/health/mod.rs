//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Sweep → sleep(interval) → Sweep → ...
//!
//! Probe (probe.rs):
//!     GET base URL with timeout
//!     → latency or transport error
//!     → state.rs classification
//!
//! Classification (state.rs):
//!     Good | Average       → Alive
//!     Overloaded | Bad     → Dead
//! ```
//!
//! # Design Decisions
//! - The monitor is the only writer of liveness after startup
//! - Forwarding failures do not feed back into liveness
//! - Health state is per-backend, not per-pool

pub mod active;
pub mod probe;
pub mod state;

pub use active::HealthMonitor;
pub use probe::Prober;
pub use state::{HealthClass, Liveness, ProbeThresholds};
