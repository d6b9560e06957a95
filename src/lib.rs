//! WireGuard peer failover sentry.
//!
//! Watches the endpoints of the `[Peer]` blocks in a WireGuard configuration,
//! keeps exactly one of them enabled, and rewrites the file plus reloads the
//! interface when the active endpoint stops answering and another one has
//! been answering long enough.

pub mod config;
pub mod controller;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod tunnel;

pub use config::SentryConfig;
pub use controller::Sentry;
pub use lifecycle::Shutdown;
pub use tunnel::{ConfigDocument, TunnelConfigFile};
