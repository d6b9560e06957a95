//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wg_sentry::controller::{ProbeSchedule, ReloadError, ReloadTrigger, SentrySettings, Thresholds};
use wg_sentry::health::{CounterLimits, Probe};
use wg_sentry::tunnel::TunnelConfigFile;

/// Three peers, the first one enabled.
pub const THREE_PEERS: &str = "\
[Interface]
PrivateKey = aW50ZXJmYWNla2V5
Address = 10.9.0.2/32

[Peer]
# site one
PublicKey = b25l
AllowedIPs = 10.9.0.0/24
Endpoint = h1:51820

#[Peer]
## site two
#PublicKey = dHdv
#AllowedIPs = 10.9.0.0/24
#Endpoint = h2:51820

#[Peer]
## site three
#PublicKey = dGhyZWU=
#AllowedIPs = 10.9.0.0/24
#Endpoint = h3:51820
";

/// A probe that replays per-host scripts; exhausted scripts answer `false`.
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    scripts: Arc<Mutex<HashMap<String, VecDeque<bool>>>>,
    calls: Arc<AtomicUsize>,
    timeouts: Arc<Mutex<Vec<Duration>>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, host: &str, results: impl IntoIterator<Item = bool>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(host.to_string())
            .or_default()
            .extend(results);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }
}

impl Probe for ScriptedProbe {
    async fn probe(&self, host: &str, timeout: Duration) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.timeouts.lock().unwrap().push(timeout);
        self.scripts
            .lock()
            .unwrap()
            .get_mut(host)
            .and_then(VecDeque::pop_front)
            .unwrap_or(false)
    }
}

/// A reload trigger that records the interfaces it was asked to reload.
#[derive(Clone, Default)]
pub struct RecordingReload {
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingReload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ReloadTrigger for RecordingReload {
    async fn reload(&self, interface: &str) -> Result<(), ReloadError> {
        self.calls.lock().unwrap().push(interface.to_string());
        if self.fail {
            Err(ReloadError::Failed {
                status: "exit status: 1".into(),
                stderr: "simulated".into(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn settings(fail_retries: u32, okay_retries: u32) -> SentrySettings {
    SentrySettings {
        interface: "wg0".into(),
        thresholds: Thresholds {
            fail_retries,
            okay_retries,
        },
        limits: CounterLimits::default(),
        schedule: ProbeSchedule::new(
            Duration::from_millis(5),
            Duration::from_millis(5),
            Duration::from_micros(100),
            None,
        ),
    }
}

/// Write `text` to `<dir>/wg0.conf`.
pub fn write_config(dir: &Path, text: &str) -> TunnelConfigFile {
    let file = TunnelConfigFile::for_interface(dir, "wg0");
    std::fs::write(file.path(), text).unwrap();
    file
}
