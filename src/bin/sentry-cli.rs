//! Operator CLI for inspecting and switching the active WireGuard peer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use wg_sentry::config::{load_config, validate_config, ConfigError, SentryConfig};
use wg_sentry::controller::{apply_switch, CommandReload};
use wg_sentry::tunnel::TunnelConfigFile;

#[derive(Parser)]
#[command(name = "sentry-cli")]
#[command(about = "Inspect or switch the active peer of a WireGuard configuration", long_about = None)]
struct Cli {
    /// Settings file (TOML), as used by wg-sentry.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Interface name (selects <config-dir>/<interface>.conf).
    #[arg(short, long)]
    interface: Option<String>,

    /// Tunnel configuration file, overriding the interface lookup.
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List peer hosts in order, marking the active one
    Hosts,
    /// Print the active host
    Active,
    /// Print the configuration as it would be written
    Show,
    /// Make HOST the active peer and write the file
    Activate {
        host: String,

        /// Also run the reload command afterwards
        #[arg(long)]
        reload: bool,
    },
}

fn resolve_config(cli: &Cli) -> Result<SentryConfig, ConfigError> {
    let mut config = match &cli.settings {
        Some(path) => load_config(path)?,
        None => SentryConfig::default(),
    };
    if let Some(interface) = &cli.interface {
        config.interface = interface.clone();
    }
    if let Some(file) = &cli.file {
        config.tunnel_config = Some(file.clone());
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = TunnelConfigFile::new(config.tunnel_config_path());
    let mut document = store.load()?;

    match cli.command {
        Commands::Hosts => {
            let active = document.get_active_host();
            for host in document.get_hosts() {
                let marker = if Some(host.as_str()) == active { "*" } else { " " };
                println!("{marker} {host}");
            }
        }
        Commands::Active => match document.get_active_host() {
            Some(host) => println!("{host}"),
            None => {
                eprintln!("Error: no peer block is enabled in {}", store.path().display());
                std::process::exit(1);
            }
        },
        Commands::Show => {
            print!("{document}");
        }
        Commands::Activate { host, reload } => {
            let trigger = if reload {
                CommandReload::from_config(&config.reload)
            } else {
                CommandReload::disabled()
            };
            apply_switch(&config.interface, &store, &mut document, &host, &trigger).await?;
            println!("{host} is now the active peer");
        }
    }

    Ok(())
}
