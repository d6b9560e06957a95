//! Per-cycle status report.

use std::fmt;

/// Result of probing one host in a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub host: String,
    pub reachable: bool,
    /// Length of the current success or failure streak.
    pub streak: u32,
}

/// What happened in one probe cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Active host after the cycle.
    pub active: String,
    pub outcomes: Vec<ProbeOutcome>,
    /// Set when this cycle switched the active host.
    pub switched_to: Option<String>,
}

impl CycleReport {
    pub fn outcome(&self, host: &str) -> Option<&ProbeOutcome> {
        self.outcomes.iter().find(|o| o.host == host)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.reachable { "OK" } else { "FAIL" };
        write!(f, "{} {}#{:02}", self.host, verdict, self.streak)
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "active {}", self.active)?;
        for outcome in &self.outcomes {
            write!(f, " | {outcome}")?;
        }
        if let Some(host) = &self.switched_to {
            write!(f, " | switched to {host}")?;
        }
        Ok(())
    }
}
