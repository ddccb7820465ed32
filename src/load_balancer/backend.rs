//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Track liveness (written by health sweeps, read by selection)
//! - Hold the forwarding adapter bound to the backend URL

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use url::Url;

use crate::config::ConfigError;
use crate::health::state::HealthClass;
use crate::http::forward::{Forwarder, UpstreamClient};

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    /// Upstream base URL. Never changes after construction.
    address: Url,
    /// Routing eligibility. Starts `true` until the first sweep says otherwise.
    alive: AtomicBool,
    /// Last class observed by a sweep (0=Unknown).
    last_class: AtomicU8,
    forwarder: Forwarder,
}

impl Backend {
    /// Create a backend for `address`, sharing `client` for forwarding.
    pub fn new(address: Url, client: UpstreamClient) -> Result<Self, ConfigError> {
        let forwarder = Forwarder::new(&address, client)?;
        Ok(Self {
            address,
            alive: AtomicBool::new(true),
            last_class: AtomicU8::new(HealthClass::Unknown as u8),
            forwarder,
        })
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }

    /// Whether the backend may receive traffic.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Set liveness, returning the previous value.
    pub fn set_alive(&self, alive: bool) -> bool {
        self.alive.swap(alive, Ordering::AcqRel)
    }

    /// Last class recorded by a sweep.
    pub fn last_class(&self) -> HealthClass {
        HealthClass::from(self.last_class.load(Ordering::Relaxed))
    }

    /// Store a probe verdict. Returns the previous liveness.
    pub fn record_class(&self, class: HealthClass) -> bool {
        self.last_class.store(class as u8, Ordering::Relaxed);
        self.set_alive(class.is_alive())
    }
}
