//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::load_balancer::{backend::Backend, LoadBalancer};

/// Round-robin selector over the alive subset.
/// Stores an internal counter; the index is taken modulo the alive count, so a
/// dead backend is never returned and membership changes never leave a stale index.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server<'a>(&self, alive: &[&'a Backend]) -> Option<&'a Backend> {
        if alive.is_empty() {
            return None;
        }
        let index = self.counter.fetch_add(1, Ordering::Relaxed) % alive.len();
        Some(alive[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::forward::upstream_client;
    use url::Url;

    fn backend(addr: &str) -> Backend {
        Backend::new(Url::parse(addr).unwrap(), upstream_client()).unwrap()
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let b1 = backend("http://127.0.0.1:8080");
        let b2 = backend("http://127.0.0.1:8081");
        let alive = [&b1, &b2];

        let s1 = lb.next_server(&alive).unwrap();
        assert_eq!(s1.address(), b1.address());

        let s2 = lb.next_server(&alive).unwrap();
        assert_eq!(s2.address(), b2.address());

        let s3 = lb.next_server(&alive).unwrap();
        assert_eq!(s3.address(), b1.address());
    }

    #[test]
    fn test_round_robin_shrinking_subset() {
        let lb = RoundRobin::new();
        let b1 = backend("http://127.0.0.1:8080");
        let b2 = backend("http://127.0.0.1:8081");

        lb.next_server(&[&b1, &b2]);
        lb.next_server(&[&b1, &b2]);
        lb.next_server(&[&b1, &b2]);

        // Counter is past the end of a one-element subset; still in range.
        let s = lb.next_server(&[&b2]).unwrap();
        assert_eq!(s.address(), b2.address());
        assert!(lb.next_server(&[]).is_none());
    }
}
