//! On-disk access to the tunnel configuration.
//!
//! # Design Decisions
//! - Writes go to a sibling temp file which is fsynced and renamed over the
//!   target, so readers see either the old or the new content
//! - The temp file takes the permissions of the existing file (it holds a
//!   private key)

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::tunnel::document::{ConfigDocument, TunnelConfigError};

/// A tunnel configuration file at a fixed path.
#[derive(Debug, Clone)]
pub struct TunnelConfigFile {
    path: PathBuf,
}

impl TunnelConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional location: `<dir>/<interface>.conf`.
    pub fn for_interface(dir: &Path, interface: &str) -> Self {
        Self::new(dir.join(format!("{interface}.conf")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    pub fn load(&self) -> Result<ConfigDocument, TunnelConfigError> {
        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        ConfigDocument::parse(&text)
    }

    /// Replace the file contents with the serialized document.
    pub fn persist(&self, document: &ConfigDocument) -> Result<(), TunnelConfigError> {
        self.write_atomic(document.serialize().as_bytes())
            .map_err(|e| self.io_error(e))
    }

    fn write_atomic(&self, payload: &[u8]) -> io::Result<()> {
        let tmp_path = self.tmp_path();
        let result = self
            .write_tmp(&tmp_path, payload)
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    fn write_tmp(&self, tmp_path: &Path, payload: &[u8]) -> io::Result<()> {
        let mut tmp_file = fs::File::create(tmp_path)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp_file.set_permissions(metadata.permissions())?;
        }
        tmp_file.write_all(payload)?;
        tmp_file.sync_all()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".sentry-tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> TunnelConfigError {
        TunnelConfigError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
