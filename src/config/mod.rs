//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → SentryConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//!
//! The tunnel configuration that gets rewritten on failover is not handled
//! here; see [`crate::tunnel`].

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    FailoverConfig, LogFormat, ObservabilityConfig, ProbeConfig, ProbeKind, ReloadConfig,
    SentryConfig,
};
pub use validation::{validate_config, ValidationError};
