//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load settings → Validate → Read tunnel config → Build sentry → Normalize
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Finish current cycle → Exit loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, then tunnel file, then the loop
//! - Cancellation reaches the wait between cycles, never a probe or write

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{build_sentry, start, StartupError, SystemSentry};
