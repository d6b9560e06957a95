//! Recognized peer fields.
//!
//! # Design Decisions
//! - Fixed, ordered list: the first name found in a line wins
//! - Matching is a case-insensitive substring test over the whole line,
//!   not an exact key comparison
//! - Lines without an `=` never match (there is no value to extract)

use std::fmt;

/// A field name the config store understands inside a peer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeerField {
    PrivateKey,
    ListenPort,
    FwMark,
    PublicKey,
    PresharedKey,
    AllowedIPs,
    Endpoint,
    PersistentKeepalive,
}

impl PeerField {
    /// All fields in matching priority order.
    pub const ALL: [PeerField; 8] = [
        PeerField::PrivateKey,
        PeerField::ListenPort,
        PeerField::FwMark,
        PeerField::PublicKey,
        PeerField::PresharedKey,
        PeerField::AllowedIPs,
        PeerField::Endpoint,
        PeerField::PersistentKeepalive,
    ];

    /// Canonical spelling as written in WireGuard configuration files.
    pub fn name(self) -> &'static str {
        match self {
            PeerField::PrivateKey => "PrivateKey",
            PeerField::ListenPort => "ListenPort",
            PeerField::FwMark => "FwMark",
            PeerField::PublicKey => "PublicKey",
            PeerField::PresharedKey => "PresharedKey",
            PeerField::AllowedIPs => "AllowedIPs",
            PeerField::Endpoint => "Endpoint",
            PeerField::PersistentKeepalive => "PersistentKeepalive",
        }
    }

    /// Find the first field whose name occurs anywhere in `line`.
    pub fn match_line(line: &str) -> Option<PeerField> {
        if !line.contains('=') {
            return None;
        }
        let lowered = line.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| lowered.contains(&field.name().to_lowercase()))
    }
}

impl fmt::Display for PeerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
