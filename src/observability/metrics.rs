//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wg_sentry_host_reachable` (gauge): 1=last probe passed, 0=failed, per host
//! - `wg_sentry_host_streak` (gauge): current streak length, per host and outcome
//! - `wg_sentry_probe_timeout_seconds` (gauge): probe timeout of the last cycle
//! - `wg_sentry_switches_total` (counter): active host changes
//! - `wg_sentry_write_failures_total` (counter): failed config writes
//! - `wg_sentry_reload_failures_total` (counter): failed reload commands
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The Prometheus listener is opt-in

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::HealthCounters;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_probe(host: &str, reachable: bool, counters: HealthCounters) {
    gauge!("wg_sentry_host_reachable", "host" => host.to_string())
        .set(if reachable { 1.0 } else { 0.0 });
    gauge!("wg_sentry_host_streak", "host" => host.to_string(), "outcome" => "okay")
        .set(f64::from(counters.consecutive_okay()));
    gauge!("wg_sentry_host_streak", "host" => host.to_string(), "outcome" => "fail")
        .set(f64::from(counters.consecutive_fail()));
}

pub fn record_probe_timeout(timeout: Duration) {
    gauge!("wg_sentry_probe_timeout_seconds").set(timeout.as_secs_f64());
}

pub fn record_switch(from: &str, to: &str) {
    counter!("wg_sentry_switches_total", "from" => from.to_string(), "to" => to.to_string())
        .increment(1);
}

pub fn record_write_failure() {
    counter!("wg_sentry_write_failures_total").increment(1);
}

pub fn record_reload_failure() {
    counter!("wg_sentry_reload_failures_total").increment(1);
}
