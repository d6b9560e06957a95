//! Reachability probes.
//!
//! # Responsibilities
//! - Answer "is this host reachable within the timeout"
//! - Never surface errors: anything other than a clean reply is `false`
//!
//! # Design Decisions
//! - `Probe` is the seam the controller is generic over; tests script it
//! - ICMP goes through the system `ping` binary (no raw sockets needed)
//! - The TCP probe suits endpoints that expose a TCP port next to WireGuard

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time;

/// Extra time granted to the ping process beyond the reply timeout.
const SPAWN_GRACE: Duration = Duration::from_secs(1);

/// A reachability oracle.
pub trait Probe: Send + Sync {
    /// Returns true if `host` answered within `timeout`.
    fn probe(&self, host: &str, timeout: Duration) -> impl Future<Output = bool> + Send;
}

/// ICMP echo via the system `ping` command.
#[derive(Debug, Clone)]
pub struct PingProbe {
    program: String,
}

impl PingProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new("ping")
    }
}

impl Probe for PingProbe {
    async fn probe(&self, host: &str, timeout: Duration) -> bool {
        if host.starts_with('-') {
            tracing::warn!(host = %host, "Refusing to ping host that looks like an option");
            return false;
        }

        let mut command = Command::new(&self.program);
        command
            .arg("-c")
            .arg("1")
            .arg("-n")
            .arg("-q")
            .arg("-W")
            .arg(format!("{:.3}", timeout.as_secs_f64()))
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "Failed to spawn ping");
                return false;
            }
        };

        match time::timeout(timeout + SPAWN_GRACE, child.wait_with_output()).await {
            Ok(Ok(output)) => output.status.success(),
            Ok(Err(e)) => {
                tracing::debug!(host = %host, error = %e, "Ping failed");
                false
            }
            Err(_) => {
                tracing::debug!(host = %host, "Ping did not exit in time");
                false
            }
        }
    }
}

/// TCP connect probe against a fixed port.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    port: u16,
}

impl TcpProbe {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Probe for TcpProbe {
    async fn probe(&self, host: &str, timeout: Duration) -> bool {
        match time::timeout(timeout, TcpStream::connect((host, self.port))).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(host = %host, port = self.port, error = %e, "TCP probe failed");
                false
            }
            Err(_) => false,
        }
    }
}

/// Probe selected at startup from configuration.
#[derive(Debug, Clone)]
pub enum HostProbe {
    Ping(PingProbe),
    Tcp(TcpProbe),
}

impl Probe for HostProbe {
    async fn probe(&self, host: &str, timeout: Duration) -> bool {
        match self {
            HostProbe::Ping(p) => p.probe(host, timeout).await,
            HostProbe::Tcp(p) => p.probe(host, timeout).await,
        }
    }
}
