//! Failover controller.
//!
//! # Data Flow
//! ```text
//! every interval:
//!     sentry.rs: probe all hosts (health::probe), merge into health::state
//!     → decision.rs: pure switch rule over the counters
//!     → on switch: tunnel::document set_active → tunnel::store persist
//!     → reload.rs: run reload command
//!     → status.rs: one report line per cycle
//!     → schedule.rs: widen probe timeout
//! ```
//!
//! # Design Decisions
//! - Single writer: only the loop touches the document and the counters
//! - Probe and reload are traits so the loop runs without a network in tests

pub mod decision;
pub mod reload;
pub mod schedule;
pub mod sentry;
pub mod status;

pub use decision::{decide, Thresholds};
pub use reload::{CommandReload, ReloadError, ReloadTrigger};
pub use schedule::ProbeSchedule;
pub use sentry::{apply_switch, Sentry, SentryError, SentrySettings};
pub use status::{CycleReport, ProbeOutcome};
