//! Backend pool management.
//!
//! # Responsibilities
//! - Own the ordered, fixed set of backends
//! - Run health sweeps and store the verdicts
//! - Apply the selection strategy to the alive subset

use crate::config::{ConfigError, Strategy};
use crate::config::validation::validate_backends;
use crate::health::probe::Prober;
use crate::http::forward::UpstreamClient;
use crate::load_balancer::{backend::Backend, strategy_for, LoadBalancer};
use crate::observability::metrics;

/// Result of one health sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub total: usize,
    pub alive: usize,
}

/// Registry of backends, shared read-only once the server starts.
#[derive(Debug)]
pub struct ServerPool {
    backends: Vec<Backend>,
    strategy: Box<dyn LoadBalancer>,
}

impl ServerPool {
    /// Create an empty pool.
    pub fn new(strategy: Box<dyn LoadBalancer>) -> Self {
        Self {
            backends: Vec::new(),
            strategy,
        }
    }

    /// Build a pool from the configured addresses, preserving their order.
    ///
    /// Fails if the list is empty or any address is malformed.
    pub fn from_addresses(
        addresses: &[String],
        client: UpstreamClient,
        strategy: Strategy,
    ) -> Result<Self, ConfigError> {
        let urls = validate_backends(addresses)?;

        let mut pool = Self::new(strategy_for(strategy));
        for url in urls {
            pool.add_backend(Backend::new(url, client.clone())?);
        }
        Ok(pool)
    }

    /// Append a backend. Only possible before the pool is shared.
    pub fn add_backend(&mut self, backend: Backend) {
        tracing::debug!(backend = %backend.address(), "Backend registered");
        self.backends.push(backend);
    }

    /// Probe every backend in order and store the results.
    ///
    /// The probe runs before the flag is touched, so selection never waits
    /// on network latency. A failed probe only affects its own backend.
    pub async fn health_sweep(&self, prober: &Prober) -> SweepSummary {
        let mut alive = 0;

        for backend in &self.backends {
            let class = prober.classify(backend.address()).await;
            let was_alive = backend.record_class(class);
            let is_alive = class.is_alive();

            if is_alive {
                alive += 1;
            }
            if was_alive != is_alive {
                tracing::info!(
                    backend = %backend.address(),
                    class = %class,
                    alive = is_alive,
                    "Backend liveness changed"
                );
            }
            metrics::record_backend_health(backend.address().as_str(), is_alive);
        }

        SweepSummary {
            total: self.backends.len(),
            alive,
        }
    }

    /// Pick an alive backend, or `None` if every backend is dead.
    pub fn select_backend(&self) -> Option<&Backend> {
        let alive: Vec<&Backend> = self.backends.iter().filter(|b| b.is_alive()).collect();
        if alive.is_empty() {
            return None;
        }
        self.strategy.next_server(&alive)
    }

    /// All backends in registration order.
    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Partner of [`ServerPool::len`].
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Number of backends currently marked alive.
    pub fn alive_count(&self) -> usize {
        self.backends.iter().filter(|b| b.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::state::HealthClass;
    use crate::http::forward::upstream_client;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn pool(addrs: &[&str], strategy: Strategy) -> ServerPool {
        let addrs: Vec<String> = addrs.iter().map(|s| s.to_string()).collect();
        ServerPool::from_addresses(&addrs, upstream_client(), strategy).unwrap()
    }

    #[test]
    fn test_empty_pool_rejected() {
        let err = ServerPool::from_addresses(&[], upstream_client(), Strategy::Random).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyBackendList));
    }

    #[test]
    fn test_malformed_address_rejected() {
        let addrs = vec!["http://127.0.0.1:8080".to_string(), "http://:99".to_string()];
        let err = ServerPool::from_addresses(&addrs, upstream_client(), Strategy::Random).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { .. }));
    }

    #[test]
    fn test_order_preserved() {
        let p = pool(
            &["http://127.0.0.1:8080", "http://127.0.0.1:8081", "localhost:8082"],
            Strategy::Random,
        );
        let ports: Vec<_> = p.backends().iter().map(|b| b.address().port()).collect();
        assert_eq!(ports, vec![Some(8080), Some(8081), Some(8082)]);
        assert_eq!(p.len(), 3);
        assert!(!p.is_empty());
        assert_eq!(p.alive_count(), 3);
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let p = ServerPool::new(strategy_for(Strategy::RoundRobin));
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
        assert!(p.select_backend().is_none());
    }

    #[test]
    fn test_never_selects_dead_backend() {
        for strategy in [Strategy::Random, Strategy::RoundRobin] {
            let p = pool(
                &["http://127.0.0.1:8080", "http://127.0.0.1:8081", "http://127.0.0.1:8082"],
                strategy,
            );
            p.backends()[0].record_class(HealthClass::Bad);
            p.backends()[2].record_class(HealthClass::Overloaded);

            for _ in 0..100 {
                let s = p.select_backend().unwrap();
                assert_eq!(s.address(), p.backends()[1].address());
            }
        }
    }

    #[test]
    fn test_all_dead_selects_none() {
        let p = pool(&["http://127.0.0.1:8080", "http://127.0.0.1:8081"], Strategy::Random);
        for b in p.backends() {
            b.record_class(HealthClass::Bad);
        }
        assert!(p.select_backend().is_none());
        assert_eq!(p.alive_count(), 0);
    }

    #[test]
    fn test_selection_covers_alive_subset() {
        let p = pool(
            &["http://127.0.0.1:8080", "http://127.0.0.1:8081", "http://127.0.0.1:8082"],
            Strategy::Random,
        );
        p.backends()[1].record_class(HealthClass::Bad);

        let mut hits: HashMap<String, usize> = HashMap::new();
        for _ in 0..10_000 {
            let s = p.select_backend().unwrap();
            *hits.entry(s.address().to_string()).or_default() += 1;
        }

        assert_eq!(hits.len(), 2);
        for count in hits.values() {
            assert!((4_500..=5_500).contains(count), "skewed distribution: {:?}", hits);
        }
    }

    #[test]
    fn test_round_robin_cycles_alive_subset() {
        let p = pool(
            &["http://127.0.0.1:8080", "http://127.0.0.1:8081", "http://127.0.0.1:8082"],
            Strategy::RoundRobin,
        );
        p.backends()[1].record_class(HealthClass::Bad);

        let picks: Vec<_> = (0..4)
            .map(|_| p.select_backend().unwrap().address().port())
            .collect();
        assert_eq!(picks, vec![Some(8080), Some(8082), Some(8080), Some(8082)]);
    }

    #[test]
    fn test_transition_visible_across_threads() {
        let p = Arc::new(pool(
            &["http://127.0.0.1:8080", "http://127.0.0.1:8081"],
            Strategy::Random,
        ));

        let writer = {
            let p = p.clone();
            std::thread::spawn(move || {
                p.backends()[0].record_class(HealthClass::Bad);
            })
        };
        writer.join().unwrap();

        let reader = {
            let p = p.clone();
            std::thread::spawn(move || {
                (0..1_000).all(|_| p.select_backend().unwrap().address().port() == Some(8081))
            })
        };
        assert!(reader.join().unwrap());
    }
}
