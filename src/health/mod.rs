//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe cycle (controller):
//!     probe.rs: probe every host with the current timeout
//!     → state.rs: update streak counters per host
//!     → controller::decision reads the counters
//! ```
//!
//! # Design Decisions
//! - State transitions require consecutive successes/failures
//! - Health state is per-host, shared by blocks naming the same host
//! - A failed probe is data, never an error

pub mod probe;
pub mod state;

pub use probe::{HostProbe, PingProbe, Probe, TcpProbe};
pub use state::{CounterLimits, HealthCounters, HealthTable};
