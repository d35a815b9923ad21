//! ASCII data models: printable item identifiers behind a textual header.
//!
//! Three schemes share one layout and one decoder. The EPC starts with a
//! 4-byte ASCII header naming the scheme, followed by the item identifier in
//! printable ASCII, padded to the EPC length with 0x00 bytes:
//!
//! ```text
//! bytes 0..4   header ("D386", "D385" or "LAN1")
//! bytes 4..    printable identifier, then zero or more 0x00 padding bytes
//! ```
//!
//! The identifier runs to the first 0x00 byte and must be non-empty; bytes
//! after it must all be padding. Each scheme resolves its own password keys,
//! unlike the numeric variants which share the DE290 ones.

use serde::{Deserialize, Serialize};

use super::TagFormat;
use crate::HEADER_LEN;

/// Header of the D386 ASCII scheme.
pub const DE386_HEADER: [u8; 4] = *b"D386";
/// Header of the D385 ASCII scheme.
pub const DE385_HEADER: [u8; 4] = *b"D385";
/// Header of the LAN1 ASCII scheme.
pub const DELAN1_HEADER: [u8; 4] = *b"LAN1";

/// Which ASCII header a tag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AsciiScheme {
    De386,
    De385,
    DeLan1,
}

impl AsciiScheme {
    /// The scheme for a header, if it is one of the ASCII headers.
    pub fn from_header(header: [u8; 4]) -> Option<Self> {
        match header {
            DE386_HEADER => Some(AsciiScheme::De386),
            DE385_HEADER => Some(AsciiScheme::De385),
            DELAN1_HEADER => Some(AsciiScheme::DeLan1),
            _ => None,
        }
    }

    /// The 4-byte header written for this scheme.
    pub const fn header(self) -> [u8; 4] {
        match self {
            AsciiScheme::De386 => DE386_HEADER,
            AsciiScheme::De385 => DE385_HEADER,
            AsciiScheme::DeLan1 => DELAN1_HEADER,
        }
    }

    /// The format identifier for this scheme.
    pub const fn format(self) -> TagFormat {
        match self {
            AsciiScheme::De386 => TagFormat::De386,
            AsciiScheme::De385 => TagFormat::De385,
            AsciiScheme::DeLan1 => TagFormat::DeLan1,
        }
    }
}

/// A tag in one of the ASCII schemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiTag {
    pc: [u8; 2],
    epc: Vec<u8>,
    scheme: AsciiScheme,
    item_id: String,
    access_password: String,
    kill_password: String,
}

impl AsciiTag {
    /// Decode an ASCII-scheme EPC.
    ///
    /// Returns `None` unless the header names a known scheme and the payload
    /// is a non-empty printable identifier followed only by 0x00 padding.
    pub fn decode(
        pc: [u8; 2],
        epc: &[u8],
        access_password: String,
        kill_password: String,
    ) -> Option<Self> {
        if epc.len() <= HEADER_LEN {
            return None;
        }
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&epc[..HEADER_LEN]);
        let scheme = AsciiScheme::from_header(header)?;

        let payload = &epc[HEADER_LEN..];
        let id_len = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
        let (identifier, padding) = payload.split_at(id_len);
        if identifier.is_empty() {
            return None;
        }
        if !identifier.iter().all(|&b| b.is_ascii_graphic() || b == b' ') {
            return None;
        }
        if padding.iter().any(|&b| b != 0) {
            return None;
        }

        let item_id = String::from_utf8(identifier.to_vec()).ok()?;
        Some(Self {
            pc,
            epc: epc.to_vec(),
            scheme,
            item_id,
            access_password,
            kill_password,
        })
    }

    /// Re-encode the EPC from the decoded fields, restoring the original
    /// padding length.
    pub fn encode_epc(&self) -> Vec<u8> {
        let mut epc = Vec::with_capacity(self.epc.len());
        epc.extend_from_slice(&self.scheme.header());
        epc.extend_from_slice(self.item_id.as_bytes());
        epc.resize(self.epc.len(), 0);
        epc
    }

    pub fn scheme(&self) -> AsciiScheme {
        self.scheme
    }

    pub fn format(&self) -> TagFormat {
        self.scheme.format()
    }

    pub fn pc(&self) -> [u8; 2] {
        self.pc
    }

    pub fn epc(&self) -> &[u8] {
        &self.epc
    }

    /// The printable item identifier, without padding.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn access_password(&self) -> &str {
        &self.access_password
    }

    pub fn kill_password(&self) -> &str {
        &self.kill_password
    }
}
