//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT) before any startup work
//! - Translate the first signal into a graceful shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A second SIGTERM/SIGINT forces an immediate exit
//! - The control loop finishes its current cycle (and any write) first

use std::io;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Exit code used when a second signal forces termination.
const FORCED_EXIT_CODE: i32 = 130;

/// Registered termination listeners.
///
/// Signals arriving after [`TerminationSignals::register`] returns are
/// delivered to [`TerminationSignals::recv`] instead of killing the process.
#[cfg(unix)]
pub struct TerminationSignals {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    pub fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the next termination request, returning its name.
    pub async fn recv(&mut self) -> io::Result<&'static str> {
        tokio::select! {
            _ = self.terminate.recv() => Ok("SIGTERM"),
            _ = self.interrupt.recv() => Ok("SIGINT"),
        }
    }
}

#[cfg(not(unix))]
pub struct TerminationSignals;

#[cfg(not(unix))]
impl TerminationSignals {
    pub fn register() -> io::Result<Self> {
        Ok(Self)
    }

    /// Wait for the next termination request, returning its name.
    pub async fn recv(&mut self) -> io::Result<&'static str> {
        tokio::signal::ctrl_c().await?;
        Ok("Ctrl-C")
    }
}

/// Register signal handlers, then spawn a task that triggers `shutdown` on
/// the first signal and exits the process on the second.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_signal_handler(shutdown: Arc<Shutdown>) -> io::Result<JoinHandle<()>> {
    let mut signals = TerminationSignals::register()?;

    Ok(tokio::spawn(async move {
        match signals.recv().await {
            Ok(name) => tracing::info!(signal = name, "Interrupted, stopping after current cycle"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to wait for signals");
                return;
            }
        }
        shutdown.trigger();

        if let Ok(name) = signals.recv().await {
            tracing::warn!(signal = name, "Second signal received, exiting immediately");
            std::process::exit(FORCED_EXIT_CODE);
        }
    }))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sigterm_after_install_triggers_graceful_shutdown() {
        let shutdown = Arc::new(Shutdown::new());
        let mut signal = shutdown.subscribe();
        let _handle = spawn_signal_handler(shutdown.clone()).unwrap();

        let status = tokio::process::Command::new("kill")
            .arg("-TERM")
            .arg(std::process::id().to_string())
            .status()
            .await
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), signal.triggered())
            .await
            .expect("SIGTERM did not trigger shutdown");
        assert!(shutdown.is_triggered());
    }
}
