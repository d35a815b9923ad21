//! Numeric library data models: the DE290 family and the short DE6 layout.
//!
//! All four headers in this module introduce fixed-width bodies with packed
//! BCD item numbers, decoded here via [`zerocopy`] views over the EPC tail.
//!
//! ## EPC layouts
//!
//! DE290 and its regional alias CD290 use a 96-bit EPC:
//!
//! ```text
//! bytes 0..4   header (DE 29 00 01, or CD 29 00 01 for the alias)
//! bytes 4..9   item number, 10 BCD digits
//! byte  9      media kind code
//! byte  10     owning branch code
//! byte  11     flag bits (bit 0: loanable)
//! ```
//!
//! DE290F is the multi-part variant for media sets, also 96 bits:
//!
//! ```text
//! bytes 0..4   header (DE 29 00 0F)
//! bytes 4..8   item number, 8 BCD digits
//! byte  8      part index within the set, 1-based
//! byte  9      total parts in the set
//! byte  10     media kind code
//! byte  11     owning branch code
//! ```
//!
//! DE6 is the legacy 64-bit layout carrying only an item number:
//!
//! ```text
//! bytes 0..4   header (DE 06 00 01)
//! bytes 4..8   item number, 8 BCD digits
//! ```
//!
//! Decoders return `None` for anything that does not fit the layout exactly;
//! the factory turns that into a raw fallback tag.

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use super::TagFormat;
use crate::HEADER_LEN;

/// Header of the primary DE290 numeric model.
pub const DE290_HEADER: [u8; 4] = [0xDE, 0x29, 0x00, 0x01];
/// Regional alias header sharing the DE290 body layout and decoder.
pub const CD290_HEADER: [u8; 4] = [0xCD, 0x29, 0x00, 0x01];
/// Header of the multi-part DE290F variant. It shares its first three bytes
/// with [`DE290_HEADER`] and must be matched with higher priority.
pub const DE290F_HEADER: [u8; 4] = [0xDE, 0x29, 0x00, 0x0F];
/// Header of the short DE6 model.
pub const DE6_HEADER: [u8; 4] = [0xDE, 0x06, 0x00, 0x01];

/// Total EPC length of DE290, CD290 and DE290F tags (96-bit EPC).
pub const DE290_EPC_LEN: usize = 12;
/// Total EPC length of DE6 tags (64-bit EPC).
pub const DE6_EPC_LEN: usize = 8;

/// Interpreted media kind codes used by the numeric models.
///
/// Tags store the raw byte; codes outside this set survive decode/encode
/// unchanged and simply have no interpretation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Other = 0,
    Book = 1,
    Journal = 2,
    AudioCd = 3,
    Dvd = 4,
    BluRay = 5,
    CdRom = 6,
}

/// Body of a DE290/CD290 EPC (bytes 4..12).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
struct De290Body {
    item_number: [u8; 5], // 10 packed BCD digits
    media_kind: u8,       // MediaKind as primitive, unknown codes pass through
    branch: u8,           // owning branch code
    flags: u8,            // bit 0: loanable
}

/// Body of a DE290F EPC (bytes 4..12).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
struct De290FBody {
    item_number: [u8; 4], // 8 packed BCD digits
    part_index: u8,       // 1-based position within the media set
    part_total: u8,       // number of parts in the set
    media_kind: u8,
    branch: u8,
}

/// Body of a DE6 EPC (bytes 4..8).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
struct De6Body {
    item_number: [u8; 4], // 8 packed BCD digits
}

/// Decode packed BCD bytes, high nibble first, into a digit string.
///
/// Returns `None` if any nibble is not a decimal digit.
fn bcd_to_digits(bytes: &[u8]) -> Option<String> {
    let mut digits = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        let hi = byte >> 4;
        let lo = byte & 0x0F;
        if hi > 9 || lo > 9 {
            return None;
        }
        digits.push(char::from(b'0' + hi));
        digits.push(char::from(b'0' + lo));
    }
    Some(digits)
}

/// A DE290 or CD290 tag: the primary item model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct De290Tag {
    pc: [u8; 2],
    epc: Vec<u8>,
    header: [u8; 4],
    body: De290Body,
    item_number: String,
    access_password: String,
    kill_password: String,
}

impl De290Tag {
    /// Decode a DE290/CD290 EPC.
    ///
    /// Returns `None` unless the EPC is exactly 12 bytes, carries one of the
    /// two base headers and holds a valid BCD item number.
    pub fn decode(
        pc: [u8; 2],
        epc: &[u8],
        access_password: String,
        kill_password: String,
    ) -> Option<Self> {
        if epc.len() != DE290_EPC_LEN {
            return None;
        }
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&epc[..HEADER_LEN]);
        if header != DE290_HEADER && header != CD290_HEADER {
            return None;
        }
        let body = De290Body::read_from(&epc[HEADER_LEN..])?;
        let item_number = bcd_to_digits(&body.item_number)?;
        Some(Self {
            pc,
            epc: epc.to_vec(),
            header,
            body,
            item_number,
            access_password,
            kill_password,
        })
    }

    /// Re-encode the EPC from the decoded fields.
    pub fn encode_epc(&self) -> Vec<u8> {
        let mut epc = Vec::with_capacity(DE290_EPC_LEN);
        epc.extend_from_slice(&self.header);
        epc.extend_from_slice(self.body.as_bytes());
        epc
    }

    /// Which of the two base headers the tag carries.
    pub fn format(&self) -> TagFormat {
        if self.header == CD290_HEADER {
            TagFormat::Cd290
        } else {
            TagFormat::De290
        }
    }

    pub fn pc(&self) -> [u8; 2] {
        self.pc
    }

    /// EPC bytes as read from the tag.
    pub fn epc(&self) -> &[u8] {
        &self.epc
    }

    /// Item number as a 10-digit string.
    pub fn item_number(&self) -> &str {
        &self.item_number
    }

    /// Raw media kind byte.
    pub fn media_kind(&self) -> u8 {
        self.body.media_kind
    }

    /// Interpreted media kind, if the code is a known one.
    pub fn media(&self) -> Option<MediaKind> {
        MediaKind::try_from(self.body.media_kind).ok()
    }

    /// Owning branch code.
    pub fn branch(&self) -> u8 {
        self.body.branch
    }

    /// Raw flag byte.
    pub fn flags(&self) -> u8 {
        self.body.flags
    }

    /// Whether the item is flagged as loanable stock.
    pub fn loanable(&self) -> bool {
        self.body.flags & 0x01 != 0
    }

    pub fn access_password(&self) -> &str {
        &self.access_password
    }

    pub fn kill_password(&self) -> &str {
        &self.kill_password
    }
}

/// A DE290F tag: one part of a multi-part media set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct De290FTag {
    pc: [u8; 2],
    epc: Vec<u8>,
    body: De290FBody,
    item_number: String,
    access_password: String,
    kill_password: String,
}

impl De290FTag {
    /// Decode a DE290F EPC.
    ///
    /// Part index and total are taken as stored; decoding does not cross
    /// check them against each other.
    pub fn decode(
        pc: [u8; 2],
        epc: &[u8],
        access_password: String,
        kill_password: String,
    ) -> Option<Self> {
        if epc.len() != DE290_EPC_LEN || epc[..HEADER_LEN] != DE290F_HEADER {
            return None;
        }
        let body = De290FBody::read_from(&epc[HEADER_LEN..])?;
        let item_number = bcd_to_digits(&body.item_number)?;
        Some(Self {
            pc,
            epc: epc.to_vec(),
            body,
            item_number,
            access_password,
            kill_password,
        })
    }

    /// Re-encode the EPC from the decoded fields.
    pub fn encode_epc(&self) -> Vec<u8> {
        let mut epc = Vec::with_capacity(DE290_EPC_LEN);
        epc.extend_from_slice(&DE290F_HEADER);
        epc.extend_from_slice(self.body.as_bytes());
        epc
    }

    pub fn format(&self) -> TagFormat {
        TagFormat::De290F
    }

    pub fn pc(&self) -> [u8; 2] {
        self.pc
    }

    pub fn epc(&self) -> &[u8] {
        &self.epc
    }

    /// Item number as an 8-digit string, shared by all parts of the set.
    pub fn item_number(&self) -> &str {
        &self.item_number
    }

    /// 1-based position of this part within the set.
    pub fn part_index(&self) -> u8 {
        self.body.part_index
    }

    /// Number of parts in the set.
    pub fn part_total(&self) -> u8 {
        self.body.part_total
    }

    pub fn media_kind(&self) -> u8 {
        self.body.media_kind
    }

    pub fn media(&self) -> Option<MediaKind> {
        MediaKind::try_from(self.body.media_kind).ok()
    }

    pub fn branch(&self) -> u8 {
        self.body.branch
    }

    pub fn access_password(&self) -> &str {
        &self.access_password
    }

    pub fn kill_password(&self) -> &str {
        &self.kill_password
    }
}

/// A DE6 tag: the legacy 64-bit item model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct De6Tag {
    pc: [u8; 2],
    epc: Vec<u8>,
    body: De6Body,
    item_number: String,
    access_password: String,
    kill_password: String,
}

impl De6Tag {
    /// Decode a DE6 EPC.
    pub fn decode(
        pc: [u8; 2],
        epc: &[u8],
        access_password: String,
        kill_password: String,
    ) -> Option<Self> {
        if epc.len() != DE6_EPC_LEN || epc[..HEADER_LEN] != DE6_HEADER {
            return None;
        }
        let body = De6Body::read_from(&epc[HEADER_LEN..])?;
        let item_number = bcd_to_digits(&body.item_number)?;
        Some(Self {
            pc,
            epc: epc.to_vec(),
            body,
            item_number,
            access_password,
            kill_password,
        })
    }

    /// Re-encode the EPC from the decoded fields.
    pub fn encode_epc(&self) -> Vec<u8> {
        let mut epc = Vec::with_capacity(DE6_EPC_LEN);
        epc.extend_from_slice(&DE6_HEADER);
        epc.extend_from_slice(self.body.as_bytes());
        epc
    }

    pub fn format(&self) -> TagFormat {
        TagFormat::De6
    }

    pub fn pc(&self) -> [u8; 2] {
        self.pc
    }

    pub fn epc(&self) -> &[u8] {
        &self.epc
    }

    /// Item number as an 8-digit string.
    pub fn item_number(&self) -> &str {
        &self.item_number
    }

    pub fn access_password(&self) -> &str {
        &self.access_password
    }

    pub fn kill_password(&self) -> &str {
        &self.kill_password
    }
}
