//! Per-host health streaks.
//!
//! # Counters
//! ```text
//! success: okay += 1 (saturating at okay_max), fail = 0
//! failure: fail += 1 (saturating at fail_max), okay = 0
//! ```
//!
//! # Design Decisions
//! - Only streaks are kept; there is no named Healthy/Unhealthy state,
//!   the switch rule interprets the counters
//! - At most one counter is nonzero at any time
//! - Counters are never persisted

use std::collections::HashMap;

/// Saturation limits for the streak counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterLimits {
    pub okay_max: u32,
    pub fail_max: u32,
}

impl Default for CounterLimits {
    fn default() -> Self {
        Self {
            okay_max: 99,
            fail_max: 99,
        }
    }
}

/// Consecutive success/failure streak of one host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthCounters {
    consecutive_okay: u32,
    consecutive_fail: u32,
}

impl HealthCounters {
    pub fn consecutive_okay(&self) -> u32 {
        self.consecutive_okay
    }

    pub fn consecutive_fail(&self) -> u32 {
        self.consecutive_fail
    }

    /// Report a successful probe.
    pub fn mark_success(&mut self, limits: CounterLimits) {
        self.consecutive_fail = 0;
        if self.consecutive_okay < limits.okay_max {
            self.consecutive_okay += 1;
        }
    }

    /// Report a failed probe.
    pub fn mark_failure(&mut self, limits: CounterLimits) {
        self.consecutive_okay = 0;
        if self.consecutive_fail < limits.fail_max {
            self.consecutive_fail += 1;
        }
    }

    /// Apply a probe result.
    pub fn record(&mut self, reachable: bool, limits: CounterLimits) {
        if reachable {
            self.mark_success(limits);
        } else {
            self.mark_failure(limits);
        }
    }

    /// Length of the current streak, whichever kind it is.
    pub fn streak(&self) -> u32 {
        self.consecutive_okay.max(self.consecutive_fail)
    }
}

/// Health counters for every known host.
#[derive(Debug, Clone, Default)]
pub struct HealthTable {
    limits: CounterLimits,
    hosts: HashMap<String, HealthCounters>,
}

impl HealthTable {
    /// Start every host at zero.
    pub fn new<I, S>(hosts: I, limits: CounterLimits) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            limits,
            hosts: hosts
                .into_iter()
                .map(|h| (h.into(), HealthCounters::default()))
                .collect(),
        }
    }

    /// Apply one probe result. Unknown hosts are added on first sight.
    pub fn record(&mut self, host: &str, reachable: bool) -> HealthCounters {
        let limits = self.limits;
        let counters = self.hosts.entry(host.to_string()).or_default();
        counters.record(reachable, limits);
        *counters
    }

    /// Counters for `host`; zero if it was never probed.
    pub fn get(&self, host: &str) -> HealthCounters {
        self.hosts.get(host).copied().unwrap_or_default()
    }

    pub fn limits(&self) -> CounterLimits {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: CounterLimits = CounterLimits {
        okay_max: 5,
        fail_max: 3,
    };

    #[test]
    fn test_success_resets_failures() {
        let mut c = HealthCounters::default();
        c.mark_failure(LIMITS);
        c.mark_failure(LIMITS);
        assert_eq!(c.consecutive_fail(), 2);

        c.mark_success(LIMITS);
        assert_eq!(c.consecutive_fail(), 0);
        assert_eq!(c.consecutive_okay(), 1);
    }

    #[test]
    fn test_failure_resets_successes() {
        let mut c = HealthCounters::default();
        c.mark_success(LIMITS);
        c.mark_failure(LIMITS);
        assert_eq!(c.consecutive_okay(), 0);
        assert_eq!(c.consecutive_fail(), 1);
    }

    #[test]
    fn test_counters_saturate() {
        let mut c = HealthCounters::default();
        for _ in 0..1000 {
            c.mark_success(LIMITS);
        }
        assert_eq!(c.consecutive_okay(), 5);

        for _ in 0..1000 {
            c.mark_failure(LIMITS);
        }
        assert_eq!(c.consecutive_fail(), 3);
        assert_eq!(c.streak(), 3);
    }

    #[test]
    fn test_only_one_counter_nonzero() {
        let mut c = HealthCounters::default();
        for reachable in [true, true, false, true, false, false, true] {
            c.record(reachable, LIMITS);
            assert!(c.consecutive_okay() == 0 || c.consecutive_fail() == 0);
        }
    }

    #[test]
    fn test_table_tracks_hosts_independently() {
        let mut table = HealthTable::new(["a", "b"], LIMITS);
        table.record("a", true);
        table.record("a", true);
        table.record("b", false);

        assert_eq!(table.get("a").consecutive_okay(), 2);
        assert_eq!(table.get("b").consecutive_fail(), 1);
        assert_eq!(table.get("c"), HealthCounters::default());
    }
}
