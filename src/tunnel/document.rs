//! Format-preserving model of a tunnel configuration file.
//!
//! # Data Flow
//! ```text
//! text → parse() → preamble + [PeerBlock]
//!      → set_active(host) toggles enabled flags
//!      → serialize() → text
//! ```
//!
//! # Design Decisions
//! - Lines are split inclusively, so terminators (and a missing final
//!   newline) round-trip unchanged
//! - Everything before the first block marker is kept verbatim as preamble
//! - Block order is significant: the first block is the default host

use std::fmt;

use thiserror::Error;

use crate::tunnel::block::PeerBlock;

/// Errors produced while reading or editing a tunnel configuration.
#[derive(Debug, Error)]
pub enum TunnelConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration contains no [Peer] blocks")]
    NoBlocks,
    #[error("peer block #{block} has no Endpoint field")]
    MissingEndpoint { block: usize },
    #[error("peer block #{block} has an unusable Endpoint value {value:?}")]
    InvalidEndpoint { block: usize, value: String },
    #[error("no peer block has endpoint host {0:?}")]
    UnknownHost(String),
}

/// Parsed configuration: preamble lines followed by peer blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    preamble: Vec<String>,
    blocks: Vec<PeerBlock>,
}

impl ConfigDocument {
    /// Parse configuration text.
    ///
    /// Fails if there is no block, or if any block lacks a usable `Endpoint`.
    pub fn parse(text: &str) -> Result<Self, TunnelConfigError> {
        let mut preamble = Vec::new();
        let mut blocks = Vec::new();
        let mut current: Option<PeerBlock> = None;

        for line in text.split_inclusive('\n') {
            if PeerBlock::is_block_start(line) {
                if let Some(block) = current.take() {
                    blocks.push(block.seal(blocks.len())?);
                }
                current = Some(PeerBlock::from_header(line));
            } else if let Some(block) = current.as_mut() {
                block.add_line(line);
            } else {
                preamble.push(line.to_string());
            }
        }

        if let Some(block) = current {
            blocks.push(block.seal(blocks.len())?);
        }
        if blocks.is_empty() {
            return Err(TunnelConfigError::NoBlocks);
        }

        Ok(Self { preamble, blocks })
    }

    /// Render the document back to text.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    pub fn blocks(&self) -> &[PeerBlock] {
        &self.blocks
    }

    /// Endpoint hosts, one per block, in block order (duplicates kept).
    pub fn get_hosts(&self) -> Vec<String> {
        self.blocks
            .iter()
            .map(|block| block.endpoint_host().to_string())
            .collect()
    }

    /// Host of the first enabled block, if any block is enabled.
    pub fn get_active_host(&self) -> Option<&str> {
        self.blocks
            .iter()
            .find(|block| block.is_enabled())
            .map(PeerBlock::endpoint_host)
    }

    /// Enable every block whose endpoint host is `host`, disable the rest.
    ///
    /// When several blocks share the host only the first one is enabled.
    /// Leaves the document untouched if no block matches.
    pub fn set_active(&mut self, host: &str) -> Result<(), TunnelConfigError> {
        let target = self
            .blocks
            .iter()
            .position(|block| block.endpoint_host() == host)
            .ok_or_else(|| TunnelConfigError::UnknownHost(host.to_string()))?;

        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.set_enabled(index == target);
        }
        Ok(())
    }

    /// Number of enabled blocks. Exactly one in a well-formed document.
    pub fn enabled_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_enabled()).count()
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
        }
        for block in &self.blocks {
            block.write_to(&mut out);
        }
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunnel::field::PeerField;

    const SAMPLE: &str = "\
# managed by wg-sentry
[Interface]
PrivateKey = cHJpdmF0ZWtleQ==
Address = 10.8.0.2/24
DNS = 1.1.1.1

[Peer]
# primary site
PublicKey = cHJpbWFyeQ==
AllowedIPs = 0.0.0.0/0
Endpoint = primary.example.net:51820
PersistentKeepalive = 25

#[Peer]
## backup site
#PublicKey = YmFja3Vw
#AllowedIPs = 0.0.0.0/0
#Endpoint = backup.example.net:51820
#PersistentKeepalive = 25
";

    #[test]
    fn test_roundtrip_is_exact() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.serialize(), SAMPLE);
    }

    #[test]
    fn test_roundtrip_without_trailing_newline() {
        let text = "[Peer]\nEndpoint = a:1";
        let doc = ConfigDocument::parse(text).unwrap();
        assert_eq!(doc.serialize(), text);
    }

    #[test]
    fn test_preamble_and_blocks() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.preamble().len(), 6);
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(
            doc.blocks()[1].field(PeerField::PublicKey),
            Some("YmFja3Vw")
        );
    }

    #[test]
    fn test_hosts_and_active() {
        let doc = ConfigDocument::parse(SAMPLE).unwrap();
        assert_eq!(
            doc.get_hosts(),
            vec!["primary.example.net", "backup.example.net"]
        );
        assert_eq!(doc.get_active_host(), Some("primary.example.net"));
    }

    #[test]
    fn test_set_active_switches_single_block() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        doc.set_active("backup.example.net").unwrap();
        assert_eq!(doc.enabled_count(), 1);
        assert_eq!(doc.get_active_host(), Some("backup.example.net"));

        let text = doc.serialize();
        assert!(text.contains("#[Peer]\n## primary site\n#PublicKey = cHJpbWFyeQ==\n"));
        assert!(text.contains("[Peer]\n# backup site\nPublicKey = YmFja3Vw\n"));
    }

    #[test]
    fn test_set_active_is_idempotent() {
        let mut once = ConfigDocument::parse(SAMPLE).unwrap();
        once.set_active("backup.example.net").unwrap();
        let mut twice = once.clone();
        twice.set_active("backup.example.net").unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.serialize(), twice.serialize());
    }

    #[test]
    fn test_set_active_unknown_host_leaves_document() {
        let mut doc = ConfigDocument::parse(SAMPLE).unwrap();
        let before = doc.clone();
        assert!(matches!(
            doc.set_active("nowhere.example.net"),
            Err(TunnelConfigError::UnknownHost(_))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_duplicate_hosts_enable_first_block_only() {
        let text = "[Peer]\nEndpoint = a:1\n#[Peer]\n#Endpoint = b:1\n#[Peer]\n#Endpoint = b:2\n";
        let mut doc = ConfigDocument::parse(text).unwrap();
        assert_eq!(doc.get_hosts(), vec!["a", "b", "b"]);
        doc.set_active("b").unwrap();
        assert_eq!(doc.enabled_count(), 1);
        assert!(doc.blocks()[1].is_enabled());
    }

    #[test]
    fn test_no_enabled_block_has_no_active_host() {
        let doc = ConfigDocument::parse("#[Peer]\n#Endpoint = a:1\n").unwrap();
        assert_eq!(doc.get_active_host(), None);
    }

    #[test]
    fn test_multiple_enabled_first_wins() {
        let doc = ConfigDocument::parse("[Peer]\nEndpoint = a:1\n[Peer]\nEndpoint = b:1\n").unwrap();
        assert_eq!(doc.get_active_host(), Some("a"));
        assert_eq!(doc.enabled_count(), 2);
    }

    #[test]
    fn test_document_without_blocks_is_rejected() {
        assert!(matches!(
            ConfigDocument::parse("[Interface]\nListenPort = 51820\n"),
            Err(TunnelConfigError::NoBlocks)
        ));
    }

    #[test]
    fn test_block_without_endpoint_is_rejected() {
        let text = "[Peer]\nEndpoint = a:1\n[Peer]\nPublicKey = x\n";
        assert!(matches!(
            ConfigDocument::parse(text),
            Err(TunnelConfigError::MissingEndpoint { block: 1 })
        ));
    }

    #[test]
    fn test_malformed_field_line_is_normalized() {
        // A commented field inside an enabled block follows the block on output.
        let text = "[Peer]\n#PersistentKeepalive = 25\nEndpoint = a:1\n";
        let doc = ConfigDocument::parse(text).unwrap();
        assert_eq!(
            doc.serialize(),
            "[Peer]\nPersistentKeepalive = 25\nEndpoint = a:1\n"
        );
    }

    #[test]
    fn test_bare_comment_line_in_disabled_block_roundtrips() {
        let text = "[Peer]\nEndpoint = a:1\n\n#[Peer]\n#PublicKey = x\n#\n#Endpoint = b:1\n";
        let mut doc = ConfigDocument::parse(text).unwrap();
        assert_eq!(doc.serialize(), text);

        // Switching away and back restores the file byte for byte.
        doc.set_active("b").unwrap();
        assert_eq!(
            doc.serialize(),
            "#[Peer]\n#Endpoint = a:1\n\n[Peer]\nPublicKey = x\n\nEndpoint = b:1\n"
        );
        doc.set_active("a").unwrap();
        assert_eq!(doc.serialize(), text);
    }
}
