//! Random load balancing strategy.

use rand::seq::SliceRandom;

use crate::load_balancer::{backend::Backend, LoadBalancer};

/// Uniform random pick among alive backends.
/// Needs no shared counter, so concurrent selections never contend.
#[derive(Debug, Default)]
pub struct RandomAlive;

impl RandomAlive {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for RandomAlive {
    fn next_server<'a>(&self, alive: &[&'a Backend]) -> Option<&'a Backend> {
        alive.choose(&mut rand::thread_rng()).copied()
    }
}
