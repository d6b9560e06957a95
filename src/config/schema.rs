//! Configuration schema definitions.
//!
//! This module defines the settings of the failover controller. All types
//! derive Serde traits for deserialization from a TOML settings file, and
//! every field has a default so the file itself is optional.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::decision::Thresholds;
use crate::controller::schedule::ProbeSchedule;
use crate::health::CounterLimits;

/// Root settings for the sentry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SentryConfig {
    /// WireGuard interface name (e.g., "wg0").
    pub interface: String,

    /// Directory holding `<interface>.conf`.
    pub config_dir: PathBuf,

    /// Explicit tunnel configuration path, overriding `config_dir`.
    pub tunnel_config: Option<PathBuf>,

    /// Switch rule and counter settings.
    pub failover: FailoverConfig,

    /// Probe settings.
    pub probe: ProbeConfig,

    /// Reload command settings.
    pub reload: ReloadConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            interface: "wg0".to_string(),
            config_dir: PathBuf::from("/etc/wireguard"),
            tunnel_config: None,
            failover: FailoverConfig::default(),
            probe: ProbeConfig::default(),
            reload: ReloadConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl SentryConfig {
    /// Path of the tunnel configuration file this sentry edits.
    pub fn tunnel_config_path(&self) -> PathBuf {
        self.tunnel_config
            .clone()
            .unwrap_or_else(|| self.config_dir.join(format!("{}.conf", self.interface)))
    }
}

/// Failover settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Time between probe cycles in milliseconds.
    pub interval_ms: u64,

    /// Consecutive failures before the active host may be replaced.
    pub fail_retries: u32,

    /// Consecutive successes before a host may take over.
    pub okay_retries: u32,

    /// Saturation limit of the success counter.
    pub okay_max: u32,

    /// Saturation limit of the failure counter.
    pub fail_max: u32,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2500,
            fail_retries: 3,
            okay_retries: 10,
            okay_max: 99,
            fail_max: 99,
        }
    }
}

impl FailoverConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            fail_retries: self.fail_retries,
            okay_retries: self.okay_retries,
        }
    }

    pub fn limits(&self) -> CounterLimits {
        CounterLimits {
            okay_max: self.okay_max,
            fail_max: self.fail_max,
        }
    }
}

/// Which reachability check to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Ping,
    Tcp,
}

/// Probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Probe type.
    pub kind: ProbeKind,

    /// Ping executable (ping probes).
    pub ping_program: String,

    /// Port to connect to (tcp probes).
    pub port: Option<u16>,

    /// Timeout of the first cycle in microseconds.
    pub initial_timeout_us: u64,

    /// Timeout growth per cycle in microseconds.
    pub timeout_step_us: u64,

    /// Upper bound of the timeout in microseconds (0 = unbounded).
    pub max_timeout_us: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kind: ProbeKind::Ping,
            ping_program: "ping".to_string(),
            port: None,
            initial_timeout_us: 5_000,
            timeout_step_us: 100,
            max_timeout_us: 1_000_000,
        }
    }
}

/// Build the cycle schedule from failover and probe settings.
pub fn probe_schedule(failover: &FailoverConfig, probe: &ProbeConfig) -> ProbeSchedule {
    ProbeSchedule::new(
        Duration::from_millis(failover.interval_ms),
        Duration::from_micros(probe.initial_timeout_us),
        Duration::from_micros(probe.timeout_step_us),
        (probe.max_timeout_us > 0).then(|| Duration::from_micros(probe.max_timeout_us)),
    )
}

/// Reload command settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Run the reload command after each write.
    pub enabled: bool,

    /// Shell used to interpret `command`.
    pub shell: String,

    /// Command template; `{interface}` is replaced by the interface name.
    pub command: String,

    /// Reload command timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shell: "bash".to_string(),
            command: "wg syncconf {interface} <(wg-quick strip {interface})".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9155".to_string(),
        }
    }
}
