//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Sentry loop produces:
//!     → logging.rs (structured log events, one status line per cycle)
//!     → metrics.rs (probe gauges, switch/failure counters)
//!
//! Consumers:
//!     → journald / stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
