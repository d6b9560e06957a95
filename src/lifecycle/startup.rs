//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate settings and read the tunnel configuration
//! - Build the probe and reload trigger named by the settings
//! - Assemble the sentry and bring the file to a single active peer
//!
//! # Design Decisions
//! - Fail fast: a bad settings or tunnel file is fatal
//! - A failed normalization write at startup is reported, not fatal

use thiserror::Error;

use crate::config::{validate_config, ConfigError, ProbeConfig, ProbeKind, SentryConfig};
use crate::controller::{CommandReload, Sentry, SentrySettings};
use crate::health::{HostProbe, PingProbe, TcpProbe};
use crate::tunnel::{TunnelConfigError, TunnelConfigFile};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot read tunnel configuration: {0}")]
    Tunnel(#[from] TunnelConfigError),
    #[error("tcp probe requires probe.port")]
    MissingProbePort,
}

/// The sentry as assembled for production use.
pub type SystemSentry = Sentry<HostProbe, CommandReload>;

/// Probe described by the settings.
pub fn build_probe(config: &ProbeConfig) -> Result<HostProbe, StartupError> {
    match config.kind {
        ProbeKind::Ping => Ok(HostProbe::Ping(PingProbe::new(config.ping_program.clone()))),
        ProbeKind::Tcp => config
            .port
            .map(|port| HostProbe::Tcp(TcpProbe::new(port)))
            .ok_or(StartupError::MissingProbePort),
    }
}

/// Validate settings, load the tunnel file and assemble the sentry.
pub fn build_sentry(config: &SentryConfig) -> Result<SystemSentry, StartupError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let store = TunnelConfigFile::new(config.tunnel_config_path());
    tracing::info!(path = %store.path().display(), "Reading tunnel configuration");
    let document = store.load()?;

    for line in document.serialize().lines() {
        tracing::debug!("{line}");
    }

    let probe = build_probe(&config.probe)?;
    let reload = CommandReload::from_config(&config.reload);

    Ok(Sentry::new(
        SentrySettings::from(config),
        store,
        document,
        probe,
        reload,
    ))
}

/// Build the sentry and normalize the file to one enabled block.
pub async fn start(config: &SentryConfig) -> Result<SystemSentry, StartupError> {
    let mut sentry = build_sentry(config)?;
    if let Err(e) = sentry.reconcile().await {
        tracing::error!(error = %e, "Failed to normalize tunnel configuration");
    }
    Ok(sentry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_for(path: &std::path::Path) -> SentryConfig {
        let mut config = SentryConfig {
            tunnel_config: Some(path.to_path_buf()),
            ..SentryConfig::default()
        };
        config.reload.enabled = false;
        config
    }

    #[test]
    fn test_tcp_probe_without_port() {
        let config = ProbeConfig {
            kind: ProbeKind::Tcp,
            ..ProbeConfig::default()
        };
        assert!(matches!(build_probe(&config), Err(StartupError::MissingProbePort)));
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let mut config = SentryConfig::default();
        config.failover.okay_retries = 0;
        assert!(matches!(build_sentry(&config), Err(StartupError::Config(_))));
    }

    #[test]
    fn test_missing_endpoint_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wg0.conf");
        fs::write(&path, "[Peer]\nPublicKey = abc\n").unwrap();

        assert!(matches!(
            build_sentry(&config_for(&path)),
            Err(StartupError::Tunnel(TunnelConfigError::MissingEndpoint { block: 0 }))
        ));
    }

    #[tokio::test]
    async fn test_start_enables_first_host_when_none_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wg0.conf");
        fs::write(&path, "#[Peer]\n#Endpoint = a:1\n#[Peer]\n#Endpoint = b:1\n").unwrap();

        let sentry = start(&config_for(&path)).await.unwrap();
        assert_eq!(sentry.active_host(), "a");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[Peer]\nEndpoint = a:1\n#[Peer]\n#Endpoint = b:1\n"
        );
    }

    #[tokio::test]
    async fn test_start_leaves_well_formed_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wg0.conf");
        let text = "#[Peer]\n#Endpoint = a:1\n\n[Peer]\nEndpoint = b:1\n";
        fs::write(&path, text).unwrap();

        let sentry = start(&config_for(&path)).await.unwrap();
        assert_eq!(sentry.active_host(), "b");
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }
}
