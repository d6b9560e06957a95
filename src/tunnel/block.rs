//! A single `[Peer]` block.
//!
//! # Responsibilities
//! - Keep every original line of the block, in order
//! - Classify lines once, at parse time
//! - Apply the block-wide comment prefix on output
//!
//! # Design Decisions
//! - Known-field lines are stored uncommented and always follow the block's
//!   enabled flag
//! - Unrecognized lines remember whether they carry the block-wide `#`. In a
//!   disabled block that is every line read with a leading `#` (a bare `#`
//!   separator included); in an enabled block it is every non-blank line
//! - Blank lines read without a `#` stay blank in either state

use std::collections::BTreeMap;

use crate::tunnel::document::TunnelConfigError;
use crate::tunnel::field::PeerField;

/// Comment character of the configuration format.
pub const COMMENT: char = '#';

/// Marker that opens a peer block.
pub const BLOCK_MARKER: &str = "[Peer]";

/// How a stored line was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    BlockHeader,
    KnownField(PeerField),
    Unrecognized,
}

/// One stored line, including its line terminator (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLine {
    pub kind: LineKind,
    /// Line content without the block-wide comment character.
    pub text: String,
    /// Written with a leading `#` while the block is disabled.
    pub toggles: bool,
}

/// A peer block and everything it contained in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerBlock {
    enabled: bool,
    lines: Vec<BlockLine>,
    fields: BTreeMap<PeerField, String>,
    host: String,
}

fn strip_comment(line: &str) -> &str {
    line.strip_prefix(COMMENT).unwrap_or(line)
}

/// Host part of an `Endpoint` value.
///
/// `[2001:db8::1]:51820` yields `2001:db8::1`; anything else is cut at the
/// first `:`.
pub fn endpoint_host(value: &str) -> &str {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix('[') {
        if let Some((host, _)) = rest.split_once(']') {
            return host.trim();
        }
    }
    value.split_once(':').map_or(value, |(host, _)| host).trim()
}

impl PeerBlock {
    /// Returns true if `line` opens a new block (commented or not).
    pub fn is_block_start(line: &str) -> bool {
        strip_comment(line).trim_start().starts_with(BLOCK_MARKER)
    }

    /// Start a block from its header line.
    ///
    /// A header beginning with the comment character denotes a disabled block.
    pub fn from_header(line: &str) -> Self {
        let enabled = !line.starts_with(COMMENT);
        Self {
            enabled,
            lines: vec![BlockLine {
                kind: LineKind::BlockHeader,
                text: strip_comment(line).to_string(),
                toggles: true,
            }],
            fields: BTreeMap::new(),
            host: String::new(),
        }
    }

    /// Classify and append a line read while parsing this block.
    pub fn add_line(&mut self, line: &str) {
        let stored = match PeerField::match_line(line) {
            Some(field) => {
                let text = strip_comment(line);
                let value = text
                    .split_once('=')
                    .map(|(_, value)| value.trim())
                    .unwrap_or_default();
                self.fields.entry(field).or_insert_with(|| value.to_string());
                BlockLine {
                    kind: LineKind::KnownField(field),
                    text: text.to_string(),
                    toggles: true,
                }
            }
            None => {
                let (text, toggles) = if self.enabled {
                    (line, !line.trim().is_empty())
                } else {
                    match line.strip_prefix(COMMENT) {
                        Some(rest) => (rest, true),
                        None => (line, false),
                    }
                };
                BlockLine {
                    kind: LineKind::Unrecognized,
                    text: text.to_string(),
                    toggles,
                }
            }
        };
        self.lines.push(stored);
    }

    /// Finish parsing: resolve the endpoint host or reject the block.
    pub(crate) fn seal(mut self, index: usize) -> Result<Self, TunnelConfigError> {
        let endpoint = self
            .fields
            .get(&PeerField::Endpoint)
            .ok_or(TunnelConfigError::MissingEndpoint { block: index })?;
        let host = endpoint_host(endpoint);
        if host.is_empty() {
            return Err(TunnelConfigError::InvalidEndpoint {
                block: index,
                value: endpoint.clone(),
            });
        }
        self.host = host.to_string();
        Ok(self)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Host portion of this block's `Endpoint`.
    pub fn endpoint_host(&self) -> &str {
        &self.host
    }

    /// Parsed value of a recognized field (first occurrence in the block).
    pub fn field(&self, field: PeerField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn lines(&self) -> &[BlockLine] {
        &self.lines
    }

    /// Append this block's text, commented out as a unit when disabled.
    pub fn write_to(&self, out: &mut String) {
        for line in &self.lines {
            if !self.enabled && line.toggles {
                out.push(COMMENT);
            }
            out.push_str(&line.text);
        }
    }
}
