//! Live reload of the tunnel after the configuration file changed.
//!
//! # Responsibilities
//! - Run the configured command with the interface name substituted
//! - Check the exit status and bound the run time
//!
//! # Design Decisions
//! - A failed reload is reported, never fatal; the written file stays the
//!   source of truth
//! - The command goes through a shell so the default
//!   `wg syncconf wg0 <(wg-quick strip wg0)` process substitution works

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time;

use crate::config::ReloadConfig;

/// Placeholder replaced by the interface name in command templates.
pub const INTERFACE_PLACEHOLDER: &str = "{interface}";

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to run reload command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("reload command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("reload command timed out after {0:?}")]
    Timeout(Duration),
}

/// Makes a freshly written configuration take effect.
pub trait ReloadTrigger: Send + Sync {
    fn reload(&self, interface: &str) -> impl Future<Output = Result<(), ReloadError>> + Send;
}

/// Reload by running a shell command.
#[derive(Debug, Clone)]
pub struct CommandReload {
    enabled: bool,
    shell: String,
    template: String,
    timeout: Duration,
}

impl CommandReload {
    pub fn new(shell: impl Into<String>, template: impl Into<String>, timeout: Duration) -> Self {
        Self {
            enabled: true,
            shell: shell.into(),
            template: template.into(),
            timeout,
        }
    }

    /// A trigger that does nothing (file is written, interface untouched).
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::from_config(&ReloadConfig::default())
        }
    }

    pub fn from_config(config: &ReloadConfig) -> Self {
        Self {
            enabled: config.enabled,
            shell: config.shell.clone(),
            template: config.command.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Command line for `interface`.
    pub fn render(&self, interface: &str) -> String {
        self.template.replace(INTERFACE_PLACEHOLDER, interface)
    }
}

impl ReloadTrigger for CommandReload {
    async fn reload(&self, interface: &str) -> Result<(), ReloadError> {
        if !self.enabled {
            tracing::debug!(interface = %interface, "Reload disabled, skipping");
            return Ok(());
        }

        let command_line = self.render(interface);
        tracing::info!(command = %command_line, "Running reload command");

        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(&command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn()?;
        match time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => Ok(()),
            Ok(Ok(output)) => Err(ReloadError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
            Ok(Err(e)) => Err(ReloadError::Spawn(e)),
            Err(_) => Err(ReloadError::Timeout(self.timeout)),
        }
    }
}
