//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → pool.rs (collect alive backends)
//!     → Apply selection strategy:
//!         - random.rs (uniform pick among alive)
//!         - round_robin.rs (rotate through alive)
//!     → backend.rs (forwarding adapter)
//!     → Return backend or None
//! ```
//!
//! # Design Decisions
//! - Strategies only ever see the alive subset
//! - Liveness is per-backend; there is no pool-wide lock
//! - Pool membership is fixed after startup

pub mod backend;
pub mod pool;
pub mod random;
pub mod round_robin;

use std::fmt::Debug;

use crate::config::Strategy;
use backend::Backend;

pub use pool::{ServerPool, SweepSummary};

/// A backend selection policy.
pub trait LoadBalancer: Send + Sync + Debug {
    /// Pick one of `alive`. Returns `None` only when `alive` is empty.
    fn next_server<'a>(&self, alive: &[&'a Backend]) -> Option<&'a Backend>;
}

/// Build the strategy named in the configuration.
pub fn strategy_for(strategy: Strategy) -> Box<dyn LoadBalancer> {
    match strategy {
        Strategy::Random => Box::new(random::RandomAlive::new()),
        Strategy::RoundRobin => Box::new(round_robin::RoundRobin::new()),
    }
}
