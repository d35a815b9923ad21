//! Format identifiers, the header registry and the decoded [`Tag`] union.
//!
//! Detection is a pure function of the EPC bytes: the first four bytes are
//! compared against [`HEADER_PATTERNS`] in priority order, and if no pattern
//! matches, the headerless barcode shape is tried last. Decoding the matched
//! format can still fail on a malformed body; the factory maps that to
//! [`RawTag`] so no input is ever rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::HEADER_LEN;

pub mod ascii;
pub mod barcode;
pub mod numeric;
pub mod raw;

pub use ascii::{AsciiScheme, AsciiTag, DE385_HEADER, DE386_HEADER, DELAN1_HEADER};
pub use barcode::{is_barcode_epc, BarcodeTag, BR_MIN_BARCODE_LEN, BR_SENTINEL};
pub use numeric::{
    De290FTag, De290Tag, De6Tag, MediaKind, CD290_HEADER, DE290F_HEADER, DE290_HEADER,
    DE290_EPC_LEN, DE6_EPC_LEN, DE6_HEADER,
};
pub use raw::RawTag;

/// Identifier of a supported tag data model.
///
/// The serialized spellings (`"DE290"`, `"DE290F"`, ...) are the stable
/// external names used in password keys and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TagFormat {
    De290,
    Cd290,
    De290F,
    De6,
    De386,
    De385,
    DeLan1,
    Br,
}

impl TagFormat {
    /// The stable external name of the format.
    pub const fn name(self) -> &'static str {
        match self {
            TagFormat::De290 => "DE290",
            TagFormat::Cd290 => "CD290",
            TagFormat::De290F => "DE290F",
            TagFormat::De6 => "DE6",
            TagFormat::De386 => "DE386",
            TagFormat::De385 => "DE385",
            TagFormat::DeLan1 => "DELAN1",
            TagFormat::Br => "BR",
        }
    }

    /// Parse a stable external name. Case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DE290" => Some(TagFormat::De290),
            "CD290" => Some(TagFormat::Cd290),
            "DE290F" => Some(TagFormat::De290F),
            "DE6" => Some(TagFormat::De6),
            "DE386" => Some(TagFormat::De386),
            "DE385" => Some(TagFormat::De385),
            "DELAN1" => Some(TagFormat::DeLan1),
            "BR" => Some(TagFormat::Br),
            _ => None,
        }
    }

    /// The fixed 4-byte header of this format, if it has one. The barcode
    /// format is recognized by shape instead.
    pub const fn header(self) -> Option<[u8; 4]> {
        match self {
            TagFormat::De290 => Some(DE290_HEADER),
            TagFormat::Cd290 => Some(CD290_HEADER),
            TagFormat::De290F => Some(DE290F_HEADER),
            TagFormat::De6 => Some(DE6_HEADER),
            TagFormat::De386 => Some(DE386_HEADER),
            TagFormat::De385 => Some(DE385_HEADER),
            TagFormat::DeLan1 => Some(DELAN1_HEADER),
            TagFormat::Br => None,
        }
    }

    /// The format whose password keys this format's decoder consults.
    ///
    /// The whole numeric family shares the base DE290 configuration; the
    /// ASCII schemes and the barcode format each own their keys.
    pub const fn password_owner(self) -> TagFormat {
        match self {
            TagFormat::De290 | TagFormat::Cd290 | TagFormat::De290F | TagFormat::De6 => {
                TagFormat::De290
            }
            other => other,
        }
    }
}

impl fmt::Display for TagFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed 4-byte header bound to exactly one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPattern {
    pub bytes: [u8; 4],
    pub format: TagFormat,
}

/// Header patterns in match priority order.
///
/// The ASCII schemes come first as a group, then DE290F ahead of the base
/// DE290/CD290 patterns: DE290F shares its first three bytes with DE290, so
/// any prefix-shaped matching must see it first. The barcode format has no
/// entry here; [`detect_format`] tries [`is_barcode_epc`] after the table.
pub const HEADER_PATTERNS: [HeaderPattern; 7] = [
    HeaderPattern { bytes: DE386_HEADER, format: TagFormat::De386 },
    HeaderPattern { bytes: DE385_HEADER, format: TagFormat::De385 },
    HeaderPattern { bytes: DELAN1_HEADER, format: TagFormat::DeLan1 },
    HeaderPattern { bytes: DE290F_HEADER, format: TagFormat::De290F },
    HeaderPattern { bytes: DE6_HEADER, format: TagFormat::De6 },
    HeaderPattern { bytes: DE290_HEADER, format: TagFormat::De290 },
    HeaderPattern { bytes: CD290_HEADER, format: TagFormat::Cd290 },
];

/// Detect the format of an EPC from its leading bytes.
///
/// Pure and total: EPCs shorter than [`HEADER_LEN`] and unknown headers
/// yield `None`. A `Some` result only says what the header claims; the
/// body may still fail to decode.
pub fn detect_format(epc: &[u8]) -> Option<TagFormat> {
    if epc.len() < HEADER_LEN {
        return None;
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&epc[..HEADER_LEN]);

    for pattern in &HEADER_PATTERNS {
        if pattern.bytes == header {
            return Some(pattern.format);
        }
    }
    if is_barcode_epc(epc) {
        return Some(TagFormat::Br);
    }
    None
}

/// A decoded tag.
///
/// Closed union over the supported data models. Re-encoding is an
/// exhaustive match, so adding a variant forces every dispatch site to
/// handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    De290(De290Tag),
    De290F(De290FTag),
    De6(De6Tag),
    Ascii(AsciiTag),
    Barcode(BarcodeTag),
    Raw(RawTag),
}

impl Tag {
    /// Protocol Control word stored with the tag.
    pub fn pc(&self) -> [u8; 2] {
        match self {
            Tag::De290(tag) => tag.pc(),
            Tag::De290F(tag) => tag.pc(),
            Tag::De6(tag) => tag.pc(),
            Tag::Ascii(tag) => tag.pc(),
            Tag::Barcode(tag) => tag.pc(),
            Tag::Raw(tag) => tag.pc(),
        }
    }

    /// EPC bytes as read from the tag.
    pub fn epc(&self) -> &[u8] {
        match self {
            Tag::De290(tag) => tag.epc(),
            Tag::De290F(tag) => tag.epc(),
            Tag::De6(tag) => tag.epc(),
            Tag::Ascii(tag) => tag.epc(),
            Tag::Barcode(tag) => tag.epc(),
            Tag::Raw(tag) => tag.epc(),
        }
    }

    /// The detected format, or `None` for the raw fallback.
    pub fn format(&self) -> Option<TagFormat> {
        match self {
            Tag::De290(tag) => Some(tag.format()),
            Tag::De290F(tag) => Some(tag.format()),
            Tag::De6(tag) => Some(tag.format()),
            Tag::Ascii(tag) => Some(tag.format()),
            Tag::Barcode(_) => Some(TagFormat::Br),
            Tag::Raw(_) => None,
        }
    }

    /// Re-encode the EPC from the decoded fields.
    ///
    /// For tags produced by decoding this is byte-identical to [`Tag::epc`];
    /// raw tags return their stored bytes unchanged.
    pub fn encode_epc(&self) -> Vec<u8> {
        match self {
            Tag::De290(tag) => tag.encode_epc(),
            Tag::De290F(tag) => tag.encode_epc(),
            Tag::De6(tag) => tag.encode_epc(),
            Tag::Ascii(tag) => tag.encode_epc(),
            Tag::Barcode(tag) => tag.encode_epc(),
            Tag::Raw(tag) => tag.encode_epc(),
        }
    }

    /// The primary item identifier the format carries, if any: the item
    /// number for the numeric models, the identifier for the ASCII schemes,
    /// the barcode for barcode tags.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Tag::De290(tag) => Some(tag.item_number()),
            Tag::De290F(tag) => Some(tag.item_number()),
            Tag::De6(tag) => Some(tag.item_number()),
            Tag::Ascii(tag) => Some(tag.item_id()),
            Tag::Barcode(tag) => Some(tag.barcode()),
            Tag::Raw(_) => None,
        }
    }

    /// The resolved access password, for formats that use one.
    pub fn access_password(&self) -> Option<&str> {
        match self {
            Tag::De290(tag) => Some(tag.access_password()),
            Tag::De290F(tag) => Some(tag.access_password()),
            Tag::De6(tag) => Some(tag.access_password()),
            Tag::Ascii(tag) => Some(tag.access_password()),
            Tag::Barcode(_) | Tag::Raw(_) => None,
        }
    }

    /// The resolved kill password, for formats that use one.
    pub fn kill_password(&self) -> Option<&str> {
        match self {
            Tag::De290(tag) => Some(tag.kill_password()),
            Tag::De290F(tag) => Some(tag.kill_password()),
            Tag::De6(tag) => Some(tag.kill_password()),
            Tag::Ascii(tag) => Some(tag.kill_password()),
            Tag::Barcode(_) | Tag::Raw(_) => None,
        }
    }

    /// The resolved shared secret, for barcode tags.
    pub fn secret_password(&self) -> Option<&str> {
        match self {
            Tag::Barcode(tag) => Some(tag.secret_password()),
            _ => None,
        }
    }
}
