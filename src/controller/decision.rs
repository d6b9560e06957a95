//! Switch rule.
//!
//! # Rule
//! ```text
//! for host in hosts (list order):
//!     host is active and fail streak < fail_retries  → stay
//!     host is not active and okay streak ≥ okay_retries → switch to host
//! nothing applied → stay
//! ```
//!
//! # Design Decisions
//! - Pure function over a snapshot of the counters; no I/O
//! - The scan stops at the first applicable entry, so at most one switch
//!   per cycle, and a healthy host earlier in the list than the active one
//!   wins it back (the first host is the preferred default)
//! - No fallback state: an unhealthy active host stays when nobody qualifies

use crate::health::HealthTable;

/// Hysteresis thresholds of the switch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Consecutive failures before the active host may be replaced.
    pub fail_retries: u32,
    /// Consecutive successes before a host may take over.
    pub okay_retries: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fail_retries: 3,
            okay_retries: 10,
        }
    }
}

/// Pick the host that should become active, if a switch is warranted.
pub fn decide<'a>(
    hosts: &'a [String],
    active_host: &str,
    health: &HealthTable,
    thresholds: &Thresholds,
) -> Option<&'a str> {
    for host in hosts {
        let counters = health.get(host);
        if host == active_host {
            if counters.consecutive_fail() < thresholds.fail_retries {
                return None;
            }
        } else if counters.consecutive_okay() >= thresholds.okay_retries {
            return Some(host);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::CounterLimits;

    const T: Thresholds = Thresholds {
        fail_retries: 3,
        okay_retries: 10,
    };

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn table(hosts: &[String], script: &[(&str, bool, usize)]) -> HealthTable {
        let mut table = HealthTable::new(hosts.iter().cloned(), CounterLimits::default());
        for (host, reachable, times) in script {
            for _ in 0..*times {
                table.record(host, *reachable);
            }
        }
        table
    }

    #[test]
    fn test_healthy_primary_stays() {
        let hosts = hosts(&["a", "b"]);
        let health = table(&hosts, &[("a", true, 1), ("b", true, 50)]);
        assert_eq!(decide(&hosts, "a", &health, &T), None);
    }

    #[test]
    fn test_two_failures_are_tolerated() {
        let hosts = hosts(&["a", "b"]);
        let health = table(&hosts, &[("a", false, 2), ("b", true, 50)]);
        assert_eq!(decide(&hosts, "a", &health, &T), None);
    }

    #[test]
    fn test_third_failure_switches_to_ready_host() {
        let hosts = hosts(&["a", "b"]);
        let health = table(&hosts, &[("a", false, 3), ("b", true, 10)]);
        assert_eq!(decide(&hosts, "a", &health, &T), Some("b"));
    }

    #[test]
    fn test_failed_active_waits_for_candidate() {
        let hosts = hosts(&["a", "b"]);
        let health = table(&hosts, &[("a", false, 40), ("b", true, 9)]);
        assert_eq!(decide(&hosts, "a", &health, &T), None);
    }

    #[test]
    fn test_first_qualifying_candidate_in_list_order() {
        let hosts = hosts(&["a", "b", "c"]);
        let health = table(&hosts, &[("a", false, 5), ("b", true, 12), ("c", true, 30)]);
        assert_eq!(decide(&hosts, "a", &health, &T), Some("b"));
    }

    #[test]
    fn test_secondary_in_grace_window_stays() {
        let hosts = hosts(&["a", "b", "c"]);
        let health = table(&hosts, &[("a", false, 9), ("b", false, 2), ("c", true, 10)]);
        assert_eq!(decide(&hosts, "b", &health, &T), None);
    }

    #[test]
    fn test_recovered_primary_is_preferred() {
        let hosts = hosts(&["a", "b"]);
        let health = table(&hosts, &[("a", true, 10), ("b", true, 10)]);
        assert_eq!(decide(&hosts, "b", &health, &T), Some("a"));
    }

    #[test]
    fn test_flapping_host_never_qualifies() {
        let hosts = hosts(&["a", "b"]);
        let mut health = table(&hosts, &[]);
        for cycle in 0..200 {
            health.record("a", false);
            health.record("b", cycle % 2 == 0);
            assert_eq!(decide(&hosts, "a", &health, &T), None);
        }
    }

    #[test]
    fn test_duplicate_hosts_share_counters() {
        let hosts = hosts(&["a", "b", "b"]);
        let health = table(&hosts, &[("a", false, 3), ("b", true, 10)]);
        assert_eq!(decide(&hosts, "a", &health, &T), Some("b"));
    }
}
