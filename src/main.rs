//! WireGuard peer failover sentry (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌───────────────────────────────────────────────────────┐
//!                │                       WG-SENTRY                        │
//!                │                                                        │
//!  wg0.conf ─────┼─▶ ┌─────────┐      ┌───────────┐      ┌──────────┐    │
//!                │   │ tunnel  │─────▶│controller │─────▶│  health  │────┼──▶ ping / tcp
//!  wg0.conf ◀────┼── │ store   │◀─────│  sentry   │◀─────│  probes  │    │    per endpoint
//!                │   └─────────┘      └─────┬─────┘      └──────────┘    │
//!                │                          │                             │
//!                │                          ▼                             │
//!                │                    ┌───────────┐                       │
//!                │                    │  reload   │───────────────────────┼──▶ wg syncconf
//!                │                    └───────────┘                       │
//!                │                                                        │
//!                │  ┌──────────────────────────────────────────────────┐ │
//!                │  │ config (TOML) │ lifecycle │ observability         │ │
//!                │  └──────────────────────────────────────────────────┘ │
//!                └───────────────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use wg_sentry::config::{load_config, validate_config, ConfigError, LogFormat, SentryConfig};
use wg_sentry::lifecycle::{self, signals, Shutdown};
use wg_sentry::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "wg-sentry")]
#[command(about = "Fail over between WireGuard peer endpoints by reachability", long_about = None)]
struct Cli {
    /// Settings file (TOML). Built-in defaults apply when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Directory containing <interface>.conf.
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Tunnel configuration file, overriding --config-dir.
    #[arg(long)]
    tunnel_config: Option<PathBuf>,

    /// Write the file on switch but do not run the reload command.
    #[arg(long)]
    no_reload: bool,

    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,

    /// WireGuard interface name.
    interface: Option<String>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn resolve_config(cli: Cli) -> Result<SentryConfig, ConfigError> {
    let mut config = match &cli.settings {
        Some(path) => load_config(path)?,
        None => SentryConfig::default(),
    };

    if let Some(interface) = cli.interface {
        config.interface = interface;
    }
    if let Some(dir) = cli.config_dir {
        config.config_dir = dir;
    }
    if let Some(path) = cli.tunnel_config {
        config.tunnel_config = Some(path);
    }
    if cli.no_reload {
        config.reload.enabled = false;
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format.into();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = resolve_config(Cli::parse())?;
    logging::init_logging(&config.observability);

    tracing::info!(
        interface = %config.interface,
        tunnel_config = %config.tunnel_config_path().display(),
        fail_retries = config.failover.fail_retries,
        okay_retries = config.failover.okay_retries,
        "wg-sentry v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Arc::new(Shutdown::new());
    let signal = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown.clone())?;

    let sentry = lifecycle::start(&config).await?;

    sentry.run(signal).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
