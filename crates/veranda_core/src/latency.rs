//! Simulated request latency.
//!
//! Service calls can pause for a fixed interval before resolving, giving
//! demo frontends the feel of real network round-trips. The pause is purely
//! presentational and injected as a policy: off by default so tests stay
//! deterministic, opt-in for demos.

use std::thread;
use std::time::Duration;

/// Pause applied before a service call returns its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Latency {
    /// No pause. The default for tests and embedders.
    #[default]
    None,
    /// Fixed pause per operation.
    Fixed(Duration),
}

impl Latency {
    /// Blocks the calling thread for the configured interval, if any.
    pub fn pause(&self) {
        if let Latency::Fixed(interval) = self {
            thread::sleep(*interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Latency;
    use std::time::{Duration, Instant};

    #[test]
    fn none_returns_immediately() {
        let started = Instant::now();
        Latency::None.pause();
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn fixed_pauses_for_at_least_the_interval() {
        let interval = Duration::from_millis(10);
        let started = Instant::now();
        Latency::Fixed(interval).pause();
        assert!(started.elapsed() >= interval);
    }
}
