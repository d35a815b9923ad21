//! # Bookwaves Tag Codec
//!
//! Decoding and re-encoding of the EPC data models found on library RFID
//! tags, plus resolution of the per-format security passwords a reader needs
//! to rewrite them.
//!
//! Tag memory arrives from a reader as two opaque pieces: the 2-byte Protocol
//! Control word (PC) and the variable-length EPC. The first bytes of the EPC
//! identify the data model; [`TagFactory`] matches them against the header
//! registry, decodes the body with the right format decoder and attaches the
//! configured passwords. Anything unrecognized or malformed degrades to a
//! [`RawTag`] that preserves the original bytes, so field data is never lost
//! to a decoding failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use bookwaves_tag::{PasswordStore, Tag, TagFactory};
//!
//! let store = PasswordStore::new();
//! let factory = TagFactory::new(store.clone());
//!
//! // 96-bit DE290 EPC: header, BCD item number, media kind, branch, flags.
//! let epc = [0xDE, 0x29, 0x00, 0x01, 0x00, 0x47, 0x11, 0x08, 0x15, 0x01, 0x02, 0x00];
//! let tag = factory.create_tag(None, Some(&epc));
//!
//! match tag {
//!     Tag::De290(tag) => {
//!         assert_eq!(tag.item_number(), "0047110815");
//!         assert_eq!(tag.encode_epc(), epc);
//!     }
//!     other => panic!("expected a DE290 tag, got {other:?}"),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`formats`] - header registry, format detection, the [`Tag`] union and
//!   the per-family decoders
//! - [`passwords`] - typed password keys and the swappable configuration
//!   snapshot
//! - [`factory`] - [`TagFactory`] construction entry points
//! - [`hex`] - EPC hex string codec used at service boundaries

use thiserror::Error;

pub mod factory;
pub mod formats;
pub mod hex;
pub mod passwords;

// Re-export the working set so callers rarely need the module paths.
pub use factory::{synthesize_pc, TagFactory};
pub use formats::{
    detect_format, AsciiScheme, AsciiTag, BarcodeTag, De290FTag, De290Tag, De6Tag, HeaderPattern,
    MediaKind, RawTag, Tag, TagFormat, HEADER_PATTERNS,
};
pub use hex::{bytes_to_hex, hex_to_bytes};
pub use passwords::{
    PasswordKey, PasswordKind, PasswordSnapshot, PasswordStore, SnapshotWarning,
    PLACEHOLDER_MARKER,
};

/// Length of the fixed format header at the start of an EPC.
///
/// EPCs shorter than this cannot be classified and always decode to a
/// [`RawTag`].
pub const HEADER_LEN: usize = 4;

/// Errors raised by the textual entry points.
///
/// Binary decoding never errors: malformed EPC bytes degrade to [`RawTag`].
/// Only hex strings, which come from humans or HTTP payloads rather than from
/// tag memory, are rejected outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The hex string was empty after stripping whitespace.
    #[error("EPC hex string must not be empty")]
    EmptyHex,

    /// The hex string had an odd number of digits.
    #[error("EPC hex string must have an even number of digits, got {length}")]
    OddHexLength { length: usize },

    /// A character outside `[0-9A-Fa-f]` appeared in the hex string.
    #[error("EPC must be a valid hexadecimal string: invalid character {character:?} at offset {index}")]
    InvalidHexCharacter { character: char, index: usize },
}

/// Result type for tag operations.
pub type Result<T> = std::result::Result<T, TagError>;
