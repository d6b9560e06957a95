//! Tunnel configuration store.
//!
//! # Data Flow
//! ```text
//! wg0.conf
//!     → store.rs (read)
//!     → document.rs (split into preamble + blocks)
//!     → block.rs (classify each line via field.rs)
//!
//! On switch:
//!     document.rs set_active(host)
//!     → serialize
//!     → store.rs (temp file + rename)
//! ```
//!
//! # Design Decisions
//! - Lossless: unknown lines, comments and ordering are preserved
//! - A block is enabled or disabled as a unit by a leading `#` on every line
//! - Parse errors are fatal; the controller cannot run without hosts

pub mod block;
pub mod document;
pub mod field;
pub mod store;

pub use block::{BlockLine, LineKind, PeerBlock};
pub use document::{ConfigDocument, TunnelConfigError};
pub use field::PeerField;
pub use store::TunnelConfigFile;
