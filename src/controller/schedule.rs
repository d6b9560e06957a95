//! Cycle timing and adaptive probe timeout.
//!
//! The probe timeout starts small and widens by a fixed step after every
//! cycle, tolerating latency that grows over a long run. An optional cap
//! stops the growth.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSchedule {
    interval: Duration,
    timeout: Duration,
    step: Duration,
    max_timeout: Option<Duration>,
}

impl ProbeSchedule {
    pub fn new(
        interval: Duration,
        initial_timeout: Duration,
        step: Duration,
        max_timeout: Option<Duration>,
    ) -> Self {
        Self {
            interval,
            timeout: initial_timeout,
            step,
            max_timeout,
        }
    }

    /// Wait between cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timeout for probes of the current cycle.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_timeout(&self) -> Option<Duration> {
        self.max_timeout
    }

    /// Advance to the next cycle's timeout.
    pub fn widen(&mut self) {
        let next = self.timeout.saturating_add(self.step);
        self.timeout = match self.max_timeout {
            Some(max) => next.min(max),
            None => next,
        };
    }
}

impl Default for ProbeSchedule {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(2500),
            Duration::from_micros(5_000),
            Duration::from_micros(100),
            Some(Duration::from_secs(1)),
        )
    }
}
