//! Backend health classes and the liveness policy.
//!
//! # States
//! - Good, Average: backend receives traffic
//! - Overloaded, Bad: backend excluded from load balancing
//!
//! # Classification
//! ```text
//! transport error / timeout        → Bad
//! latency <  good_below            → Good
//! latency <  overloaded_at         → Average
//! latency >= overloaded_at         → Overloaded
//! ```
//!
//! # Design Decisions
//! - No hysteresis: every sweep overwrites the previous verdict
//! - The gradation is for reporting; routing only consumes Alive/Dead

use std::fmt;
use std::time::Duration;

use crate::config::HealthCheckConfig;

/// Outcome of one probe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthClass {
    /// Not probed yet.
    Unknown = 0,
    Good = 1,
    Average = 2,
    Overloaded = 3,
    Bad = 4,
}

impl From<u8> for HealthClass {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthClass::Good,
            2 => HealthClass::Average,
            3 => HealthClass::Overloaded,
            4 => HealthClass::Bad,
            _ => HealthClass::Unknown,
        }
    }
}

impl fmt::Display for HealthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HealthClass::Unknown => "Unknown",
            HealthClass::Good => "Good",
            HealthClass::Average => "Average",
            HealthClass::Overloaded => "Overloaded",
            HealthClass::Bad => "Bad",
        };
        f.write_str(name)
    }
}

/// Routing eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

impl HealthClass {
    /// Good and Average are alive. Unknown counts as alive until the first sweep.
    pub fn liveness(self) -> Liveness {
        match self {
            HealthClass::Unknown | HealthClass::Good | HealthClass::Average => Liveness::Alive,
            HealthClass::Overloaded | HealthClass::Bad => Liveness::Dead,
        }
    }

    pub fn is_alive(self) -> bool {
        self.liveness() == Liveness::Alive
    }
}

/// Latency thresholds for a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeThresholds {
    pub good_below: Duration,
    pub overloaded_at: Duration,
}

impl Default for ProbeThresholds {
    fn default() -> Self {
        Self {
            good_below: Duration::from_millis(500),
            overloaded_at: Duration::from_secs(1),
        }
    }
}

impl From<&HealthCheckConfig> for ProbeThresholds {
    fn from(config: &HealthCheckConfig) -> Self {
        Self {
            good_below: Duration::from_millis(config.good_below_ms),
            overloaded_at: Duration::from_millis(config.overloaded_at_ms),
        }
    }
}

impl ProbeThresholds {
    /// Grade the round-trip latency of a probe that got a response.
    pub fn classify(&self, latency: Duration) -> HealthClass {
        if latency < self.good_below {
            HealthClass::Good
        } else if latency < self.overloaded_at {
            HealthClass::Average
        } else {
            HealthClass::Overloaded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_bands() {
        let t = ProbeThresholds::default();
        assert_eq!(t.classify(Duration::from_millis(200)), HealthClass::Good);
        assert_eq!(t.classify(Duration::from_millis(499)), HealthClass::Good);
        assert_eq!(t.classify(Duration::from_millis(500)), HealthClass::Average);
        assert_eq!(t.classify(Duration::from_millis(700)), HealthClass::Average);
        assert_eq!(t.classify(Duration::from_millis(1000)), HealthClass::Overloaded);
        assert_eq!(t.classify(Duration::from_millis(1200)), HealthClass::Overloaded);
    }

    #[test]
    fn test_liveness_policy() {
        assert_eq!(HealthClass::Good.liveness(), Liveness::Alive);
        assert_eq!(HealthClass::Average.liveness(), Liveness::Alive);
        assert_eq!(HealthClass::Overloaded.liveness(), Liveness::Dead);
        assert_eq!(HealthClass::Bad.liveness(), Liveness::Dead);
    }

    #[test]
    fn test_u8_round_trip() {
        for class in [
            HealthClass::Unknown,
            HealthClass::Good,
            HealthClass::Average,
            HealthClass::Overloaded,
            HealthClass::Bad,
        ] {
            assert_eq!(HealthClass::from(class as u8), class);
        }
        assert_eq!(HealthClass::from(42), HealthClass::Unknown);
    }

    #[test]
    fn test_thresholds_from_config() {
        let config = HealthCheckConfig {
            good_below_ms: 100,
            overloaded_at_ms: 300,
            ..HealthCheckConfig::default()
        };
        let t = ProbeThresholds::from(&config);
        assert_eq!(t.classify(Duration::from_millis(150)), HealthClass::Average);
        assert_eq!(t.classify(Duration::from_millis(300)), HealthClass::Overloaded);
    }
}
