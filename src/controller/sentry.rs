//! The failover control loop.
//!
//! # Responsibilities
//! - Probe every host once per cycle and update the streak counters
//! - Apply the switch rule and, on a switch, rewrite and reload the tunnel
//! - Stop between cycles when shutdown is requested
//!
//! # Design Decisions
//! - Probes fan out concurrently; counters are updated in one merge step
//!   after all results are in, so the rule sees one consistent snapshot
//! - Shutdown is observed at the start of a cycle and during the wait,
//!   never mid-cycle, so a started write always completes
//! - Write and reload failures are logged and the loop keeps going; the
//!   in-memory active host is not rolled back

use std::collections::HashSet;

use futures_util::future::join_all;
use thiserror::Error;
use tokio::time;

use crate::config::schema::{probe_schedule, SentryConfig};
use crate::controller::decision::{decide, Thresholds};
use crate::controller::reload::{ReloadError, ReloadTrigger};
use crate::controller::schedule::ProbeSchedule;
use crate::controller::status::{CycleReport, ProbeOutcome};
use crate::health::{CounterLimits, HealthTable, Probe};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::tunnel::{ConfigDocument, TunnelConfigError, TunnelConfigFile};

#[derive(Debug, Error)]
pub enum SentryError {
    #[error(transparent)]
    Tunnel(#[from] TunnelConfigError),
    #[error(transparent)]
    Reload(#[from] ReloadError),
}

/// Tunables of a sentry instance.
#[derive(Debug, Clone)]
pub struct SentrySettings {
    pub interface: String,
    pub thresholds: Thresholds,
    pub limits: CounterLimits,
    pub schedule: ProbeSchedule,
}

impl From<&SentryConfig> for SentrySettings {
    fn from(config: &SentryConfig) -> Self {
        Self {
            interface: config.interface.clone(),
            thresholds: config.failover.thresholds(),
            limits: config.failover.limits(),
            schedule: probe_schedule(&config.failover, &config.probe),
        }
    }
}

/// Enable `host` in `document`, write it out and reload the interface.
pub async fn apply_switch<R: ReloadTrigger>(
    interface: &str,
    store: &TunnelConfigFile,
    document: &mut ConfigDocument,
    host: &str,
    reload: &R,
) -> Result<(), SentryError> {
    document.set_active(host)?;
    if let Err(e) = store.persist(document) {
        metrics::record_write_failure();
        return Err(e.into());
    }
    if let Err(e) = reload.reload(interface).await {
        metrics::record_reload_failure();
        return Err(e.into());
    }
    Ok(())
}

/// Reachability-driven failover controller for one interface.
pub struct Sentry<P, R> {
    interface: String,
    store: TunnelConfigFile,
    document: ConfigDocument,
    hosts: Vec<String>,
    active_host: String,
    health: HealthTable,
    thresholds: Thresholds,
    schedule: ProbeSchedule,
    probe: P,
    reload: R,
}

impl<P: Probe, R: ReloadTrigger> Sentry<P, R> {
    /// Build a sentry over an already parsed document.
    ///
    /// The active host is the first enabled block's host, or the first host
    /// when no block is enabled.
    pub fn new(
        settings: SentrySettings,
        store: TunnelConfigFile,
        document: ConfigDocument,
        probe: P,
        reload: R,
    ) -> Self {
        let hosts = document.get_hosts();
        let active_host = match document.get_active_host() {
            Some(host) => host.to_string(),
            None => {
                let first = hosts.first().cloned().unwrap_or_default();
                tracing::warn!(host = %first, "No enabled peer block, defaulting to first host");
                first
            }
        };

        Self {
            interface: settings.interface,
            store,
            document,
            health: HealthTable::new(hosts.iter().cloned(), settings.limits),
            hosts,
            active_host,
            thresholds: settings.thresholds,
            schedule: settings.schedule,
            probe,
            reload,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn active_host(&self) -> &str {
        &self.active_host
    }

    pub fn health(&self) -> &HealthTable {
        &self.health
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn schedule(&self) -> &ProbeSchedule {
        &self.schedule
    }

    /// Make the file agree with the active host when it does not have
    /// exactly one enabled block. Returns true if it was rewritten.
    pub async fn reconcile(&mut self) -> Result<bool, SentryError> {
        let enabled = self.document.enabled_count();
        if enabled == 1 {
            return Ok(false);
        }

        tracing::warn!(
            enabled_blocks = enabled,
            active = %self.active_host,
            "Normalizing tunnel configuration to a single active peer"
        );
        apply_switch(
            &self.interface,
            &self.store,
            &mut self.document,
            &self.active_host,
            &self.reload,
        )
        .await?;
        Ok(true)
    }

    /// Run cycles until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) {
        tracing::info!(
            interface = %self.interface,
            hosts = ?self.hosts,
            active = %self.active_host,
            interval_ms = self.schedule.interval().as_millis() as u64,
            "Sentry starting"
        );

        loop {
            if shutdown.is_triggered() {
                break;
            }

            self.run_cycle().await;

            tokio::select! {
                _ = time::sleep(self.schedule.interval()) => {}
                _ = shutdown.triggered() => break,
            }
            self.schedule.widen();
        }

        tracing::info!(active = %self.active_host, "Sentry stopped");
    }

    /// One probe-and-decide cycle.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let timeout = self.schedule.timeout();
        metrics::record_probe_timeout(timeout);

        let mut seen = HashSet::new();
        let targets: Vec<&str> = self
            .hosts
            .iter()
            .map(String::as_str)
            .filter(|host| seen.insert(*host))
            .collect();

        let results = join_all(targets.iter().map(|host| self.probe.probe(host, timeout))).await;

        let mut outcomes = Vec::with_capacity(targets.len());
        for (host, reachable) in targets.iter().zip(results) {
            let counters = self.health.record(host, reachable);
            metrics::record_probe(host, reachable, counters);
            outcomes.push(ProbeOutcome {
                host: host.to_string(),
                reachable,
                streak: counters.streak(),
            });
        }

        let next = decide(&self.hosts, &self.active_host, &self.health, &self.thresholds)
            .map(str::to_string);
        let switched_to = match next {
            Some(host) => self.switch_active(&host).await,
            None => None,
        };

        let report = CycleReport {
            active: self.active_host.clone(),
            outcomes,
            switched_to,
        };
        tracing::info!(active = %report.active, "{report}");
        report
    }

    /// Make `host` the active host. Returns the host if it changed.
    ///
    /// Naming the already active host only logs.
    pub async fn switch_active(&mut self, host: &str) -> Option<String> {
        if host == self.active_host {
            tracing::info!(host = %host, "Would switch, but host is already active");
            return None;
        }

        tracing::info!(from = %self.active_host, to = %host, "Switching active peer");
        let previous = std::mem::replace(&mut self.active_host, host.to_string());
        metrics::record_switch(&previous, host);

        if let Err(e) = apply_switch(
            &self.interface,
            &self.store,
            &mut self.document,
            host,
            &self.reload,
        )
        .await
        {
            tracing::error!(host = %host, error = %e, "Failed to apply switch, continuing");
        }
        Some(host.to_string())
    }
}
