//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, retries reachable under the caps)
//! - Reject interface names that are unsafe to put in a shell command
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SentryConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::{ProbeKind, SentryConfig};

/// Maximum length of a Linux interface name.
const MAX_INTERFACE_LEN: usize = 15;

/// A single semantic problem with the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Same character set `wg-quick` accepts for interface names.
pub fn is_valid_interface_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_INTERFACE_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '=' | '+' | '.' | '-'))
}

/// Check the settings, collecting every problem found.
pub fn validate_config(config: &SentryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_valid_interface_name(&config.interface) {
        errors.push(ValidationError::new(
            "interface",
            format!(
                "{:?} is not a valid interface name (1-{} chars of A-Z a-z 0-9 _ = + . -)",
                config.interface, MAX_INTERFACE_LEN
            ),
        ));
    }

    let failover = &config.failover;
    if failover.interval_ms == 0 {
        errors.push(ValidationError::new("failover.interval_ms", "must be greater than 0"));
    }
    if failover.fail_retries == 0 {
        errors.push(ValidationError::new("failover.fail_retries", "must be at least 1"));
    }
    if failover.okay_retries == 0 {
        errors.push(ValidationError::new("failover.okay_retries", "must be at least 1"));
    }
    if failover.okay_retries > failover.okay_max {
        errors.push(ValidationError::new(
            "failover.okay_retries",
            format!("exceeds okay_max ({}) and could never be reached", failover.okay_max),
        ));
    }
    if failover.fail_retries > failover.fail_max {
        errors.push(ValidationError::new(
            "failover.fail_retries",
            format!("exceeds fail_max ({}) and could never be reached", failover.fail_max),
        ));
    }

    let probe = &config.probe;
    if probe.initial_timeout_us == 0 {
        errors.push(ValidationError::new("probe.initial_timeout_us", "must be greater than 0"));
    }
    if probe.max_timeout_us > 0 && probe.max_timeout_us < probe.initial_timeout_us {
        errors.push(ValidationError::new(
            "probe.max_timeout_us",
            "must not be below initial_timeout_us",
        ));
    }
    match probe.kind {
        ProbeKind::Tcp if probe.port.is_none() => {
            errors.push(ValidationError::new("probe.port", "required for tcp probes"));
        }
        ProbeKind::Ping if probe.ping_program.trim().is_empty() => {
            errors.push(ValidationError::new("probe.ping_program", "must not be empty"));
        }
        _ => {}
    }

    let reload = &config.reload;
    if reload.enabled {
        if reload.command.trim().is_empty() {
            errors.push(ValidationError::new("reload.command", "must not be empty"));
        }
        if reload.shell.trim().is_empty() {
            errors.push(ValidationError::new("reload.shell", "must not be empty"));
        }
        if reload.timeout_secs == 0 {
            errors.push(ValidationError::new("reload.timeout_secs", "must be greater than 0"));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address (e.g. 127.0.0.1:9155)",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
