//! Tag construction: format detection, body decoding, password injection and
//! the raw fallback policy.
//!
//! [`TagFactory`] is the one place where detection, decoding and password
//! resolution meet. The binary entry point never fails; whatever a reader
//! delivers becomes some [`Tag`], with anything unusable preserved as
//! [`Tag::Raw`]. Only the hex entry point rejects input, since its strings
//! come from humans and HTTP payloads rather than from tag memory.
//!
//! Decoders themselves stay silent; this module is the logging boundary for
//! the decode path.

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, warn};

use crate::formats::{
    detect_format, AsciiTag, BarcodeTag, De290FTag, De290Tag, De6Tag, RawTag, Tag, TagFormat,
};
use crate::hex;
use crate::passwords::{PasswordKind, PasswordSnapshot, PasswordStore};
use crate::{Result, HEADER_LEN};

/// Build a PC word for a bare EPC: the EPC word count in the top five bits,
/// everything else zero. This matches what a reader reports for an EPC of
/// that length. Lengths beyond the 5-bit range are masked.
pub fn synthesize_pc(epc: &[u8]) -> [u8; 2] {
    let word_count = ((epc.len() / 2) & 0x1F) as u16;
    let mut pc = [0u8; 2];
    BigEndian::write_u16(&mut pc, word_count << 11);
    pc
}

/// Creates [`Tag`] values from reader data, auto-detecting the format.
///
/// The factory holds a [`PasswordStore`] handle and takes one snapshot per
/// created tag, so a configuration swap mid-inventory cannot mix two
/// configurations within a single tag.
#[derive(Debug, Clone, Default)]
pub struct TagFactory {
    passwords: PasswordStore,
}

impl TagFactory {
    /// A factory resolving passwords from the given store.
    pub fn new(passwords: PasswordStore) -> Self {
        Self { passwords }
    }

    /// The password store this factory resolves from.
    pub fn passwords(&self) -> &PasswordStore {
        &self.passwords
    }

    /// Create a tag from PC and EPC bytes.
    ///
    /// Never fails: a missing PC defaults to two zero bytes, a missing or
    /// empty EPC produces an empty raw tag, and an unknown header or
    /// malformed body degrades to a raw tag preserving the original bytes.
    pub fn create_tag(&self, pc: Option<[u8; 2]>, epc: Option<&[u8]>) -> Tag {
        let pc = pc.unwrap_or([0, 0]);
        let epc = match epc {
            Some(epc) if !epc.is_empty() => epc,
            _ => {
                warn!("Received null/empty EPC, creating empty raw tag");
                return Tag::Raw(RawTag::new(pc, Vec::new()));
            }
        };
        if epc.len() < HEADER_LEN {
            warn!(
                len = epc.len(),
                epc = %hex::bytes_to_hex(epc),
                "EPC too short to determine format, creating raw tag"
            );
            return Tag::Raw(RawTag::new(pc, epc.to_vec()));
        }

        let Some(format) = detect_format(epc) else {
            debug!(
                header = %hex::bytes_to_hex(&epc[..HEADER_LEN]),
                "Unknown EPC header, creating raw tag"
            );
            return Tag::Raw(RawTag::new(pc, epc.to_vec()));
        };

        // One snapshot for the whole tag.
        let snapshot = self.passwords.snapshot();
        match decode_format(format, pc, epc, &snapshot) {
            Some(tag) => {
                debug!(format = %format, "Detected tag from EPC header");
                tag
            }
            None => {
                debug!(
                    format = %format,
                    len = epc.len(),
                    "EPC body does not fit the detected format, creating raw tag"
                );
                Tag::Raw(RawTag::new(pc, epc.to_vec()))
            }
        }
    }

    /// Create a tag from an EPC hex string, synthesizing the PC word from
    /// the EPC length.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::TagError`] when the string is not valid hex; see
    /// [`hex::hex_to_bytes`]. A valid hex string never fails, it degrades to
    /// a raw tag like the binary entry point.
    pub fn create_tag_from_hex(&self, epc_hex: &str) -> Result<Tag> {
        let epc = hex::hex_to_bytes(epc_hex)?;
        Ok(self.create_tag(Some(synthesize_pc(&epc)), Some(&epc)))
    }
}

/// Dispatch to the decoder for a detected format, resolving its passwords
/// from the snapshot.
fn decode_format(
    format: TagFormat,
    pc: [u8; 2],
    epc: &[u8],
    snapshot: &PasswordSnapshot,
) -> Option<Tag> {
    match format {
        TagFormat::De290 | TagFormat::Cd290 => De290Tag::decode(
            pc,
            epc,
            snapshot.resolve(format, PasswordKind::Access),
            snapshot.resolve(format, PasswordKind::Kill),
        )
        .map(Tag::De290),
        TagFormat::De290F => De290FTag::decode(
            pc,
            epc,
            snapshot.resolve(format, PasswordKind::Access),
            snapshot.resolve(format, PasswordKind::Kill),
        )
        .map(Tag::De290F),
        TagFormat::De6 => De6Tag::decode(
            pc,
            epc,
            snapshot.resolve(format, PasswordKind::Access),
            snapshot.resolve(format, PasswordKind::Kill),
        )
        .map(Tag::De6),
        TagFormat::De386 | TagFormat::De385 | TagFormat::DeLan1 => AsciiTag::decode(
            pc,
            epc,
            snapshot.resolve(format, PasswordKind::Access),
            snapshot.resolve(format, PasswordKind::Kill),
        )
        .map(Tag::Ascii),
        TagFormat::Br => BarcodeTag::decode(
            pc,
            epc,
            snapshot.resolve(format, PasswordKind::Secret),
        )
        .map(Tag::Barcode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagError;
    use std::collections::HashMap;

    fn configured_factory(pairs: &[(&str, &str)]) -> TagFactory {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let store = PasswordStore::new();
        store.install_from_map(&map, TagFormat::De290);
        TagFactory::new(store)
    }

    const DE290_EPC: [u8; 12] = [
        0xDE, 0x29, 0x00, 0x01, 0x12, 0x34, 0x56, 0x78, 0x90, 0x01, 0x02, 0x00,
    ];

    #[test]
    fn test_missing_epc_yields_empty_raw_tag() {
        let factory = TagFactory::default();
        for tag in [
            factory.create_tag(None, None),
            factory.create_tag(None, Some(&[])),
        ] {
            match tag {
                Tag::Raw(raw) => {
                    assert_eq!(raw.pc(), [0, 0]);
                    assert!(raw.epc().is_empty());
                }
                other => panic!("expected raw tag, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_short_epc_preserved_in_raw_tag() {
        let factory = TagFactory::default();
        let tag = factory.create_tag(Some([0x18, 0x00]), Some(&[0x12, 0x34, 0x56]));
        match tag {
            Tag::Raw(raw) => {
                assert_eq!(raw.pc(), [0x18, 0x00]);
                assert_eq!(raw.epc(), [0x12, 0x34, 0x56]);
            }
            other => panic!("expected raw tag, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_header_preserved_in_raw_tag() {
        let factory = TagFactory::default();
        let epc = [0x00, 0x00, 0x00, 0x00];
        let tag = factory.create_tag(Some([0x10, 0x00]), Some(&epc));
        match tag {
            Tag::Raw(raw) => {
                assert_eq!(raw.epc(), epc);
                assert_eq!(raw.encode_epc(), epc);
            }
            other => panic!("expected raw tag, got {other:?}"),
        }
    }

    #[test]
    fn test_de290_with_configured_passwords() {
        let factory = configured_factory(&[
            ("DE290.access", "12345678"),
            ("DE290.kill", "87654321"),
        ]);
        let tag = factory.create_tag(Some([0x30, 0x00]), Some(&DE290_EPC));
        match tag {
            Tag::De290(tag) => {
                assert_eq!(tag.item_number(), "1234567890");
                assert_eq!(tag.access_password(), "12345678");
                assert_eq!(tag.kill_password(), "87654321");
            }
            other => panic!("expected DE290 tag, got {other:?}"),
        }
    }

    #[test]
    fn test_variant_resolves_base_format_passwords() {
        let factory = configured_factory(&[("DE290.access", "sharedpw")]);

        let f_epc = [
            0xDE, 0x29, 0x00, 0x0F, 0x00, 0x12, 0x98, 0x76, 0x01, 0x02, 0x01, 0x03,
        ];
        match factory.create_tag(Some([0x30, 0x00]), Some(&f_epc)) {
            Tag::De290F(tag) => assert_eq!(tag.access_password(), "sharedpw"),
            other => panic!("expected DE290F tag, got {other:?}"),
        }

        let de6_epc = [0xDE, 0x06, 0x00, 0x01, 0x00, 0x11, 0x22, 0x33];
        match factory.create_tag(Some([0x20, 0x00]), Some(&de6_epc)) {
            Tag::De6(tag) => assert_eq!(tag.access_password(), "sharedpw"),
            other => panic!("expected DE6 tag, got {other:?}"),
        }
    }

    #[test]
    fn test_unconfigured_ascii_gets_placeholders() {
        let factory = TagFactory::default();
        match factory.create_tag(Some([0x28, 0x00]), Some(b"D386MEDIA123")) {
            Tag::Ascii(tag) => {
                assert_eq!(tag.item_id(), "MEDIA123");
                assert_eq!(tag.access_password(), "CHANGE-ME-IN-YAML-ACCESS");
                assert_eq!(tag.kill_password(), "CHANGE-ME-IN-YAML-KILL");
            }
            other => panic!("expected ASCII tag, got {other:?}"),
        }
    }

    #[test]
    fn test_barcode_resolves_secret() {
        let factory = configured_factory(&[("BR.secret", "hush")]);
        match factory.create_tag(Some([0x28, 0x00]), Some(b"B0012345")) {
            Tag::Barcode(tag) => {
                assert_eq!(tag.barcode(), "0012345");
                assert_eq!(tag.secret_password(), "hush");
            }
            other => panic!("expected barcode tag, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_degrades_to_raw_tag() {
        let factory = TagFactory::default();
        // DE290 header with a non-BCD item number.
        let bad_bcd = [
            0xDE, 0x29, 0x00, 0x01, 0xAB, 0x34, 0x56, 0x78, 0x90, 0x01, 0x02, 0x00,
        ];
        // DE290 header with a truncated body.
        let bad_len = [0xDE, 0x29, 0x00, 0x01, 0x12, 0x34];
        for epc in [&bad_bcd[..], &bad_len[..]] {
            match factory.create_tag(Some([0x30, 0x00]), Some(epc)) {
                Tag::Raw(raw) => assert_eq!(raw.epc(), epc),
                other => panic!("expected raw tag, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_configuration_swap_applies_to_next_tag() {
        let store = PasswordStore::new();
        let factory = TagFactory::new(store.clone());

        let before = factory.create_tag(Some([0x30, 0x00]), Some(&DE290_EPC));
        assert_eq!(before.access_password(), Some("CHANGE-ME-IN-YAML-ACCESS"));

        let mut map = HashMap::new();
        map.insert("DE290.access".to_string(), "realpw00".to_string());
        store.install_from_map(&map, TagFormat::De290);

        let after = factory.create_tag(Some([0x30, 0x00]), Some(&DE290_EPC));
        assert_eq!(after.access_password(), Some("realpw00"));
        // The earlier tag keeps the passwords it was created with.
        assert_eq!(before.access_password(), Some("CHANGE-ME-IN-YAML-ACCESS"));
    }

    #[test]
    fn test_create_from_hex_synthesizes_pc() {
        let factory = TagFactory::default();
        let tag = factory
            .create_tag_from_hex("de 29 00 01 12 34 56 78 90 01 02 00")
            .unwrap();
        assert_eq!(tag.pc(), [0x30, 0x00]);
        assert_eq!(tag.format(), Some(TagFormat::De290));
        assert_eq!(tag.epc(), DE290_EPC);
    }

    #[test]
    fn test_create_from_hex_rejects_invalid_input() {
        let factory = TagFactory::default();
        assert_eq!(
            factory.create_tag_from_hex(""),
            Err(TagError::EmptyHex)
        );
        assert_eq!(
            factory.create_tag_from_hex("30012"),
            Err(TagError::OddHexLength { length: 5 })
        );
        assert_eq!(
            factory.create_tag_from_hex("3000G2"),
            Err(TagError::InvalidHexCharacter {
                character: 'G',
                index: 4
            })
        );
    }

    #[test]
    fn test_create_from_hex_unknown_header_is_ok() {
        let factory = TagFactory::default();
        let tag = factory.create_tag_from_hex("3000ABCD12").unwrap();
        assert_eq!(tag.format(), None);
        assert_eq!(tag.epc(), [0x30, 0x00, 0xAB, 0xCD, 0x12]);
    }

    #[test]
    fn test_synthesize_pc_word_count() {
        assert_eq!(synthesize_pc(&[]), [0x00, 0x00]);
        assert_eq!(synthesize_pc(&[0; 8]), [0x20, 0x00]);
        assert_eq!(synthesize_pc(&[0; 12]), [0x30, 0x00]);
        assert_eq!(synthesize_pc(&[0; 24]), [0x60, 0x00]);
        // Odd lengths round down to whole words.
        assert_eq!(synthesize_pc(&[0; 5]), [0x10, 0x00]);
    }
}
