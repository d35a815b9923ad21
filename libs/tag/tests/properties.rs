//! Quantified decoding laws: totality, determinism and re-encode fidelity.

use proptest::prelude::*;

use bookwaves_tag::{bytes_to_hex, hex_to_bytes, Tag, TagFactory};

/// Pack a decimal digit string into BCD, high nibble first.
fn digits_to_bcd(digits: &str) -> Vec<u8> {
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| ((pair[0] - b'0') << 4) | (pair[1] - b'0'))
        .collect()
}

proptest! {
    /// Any byte input produces a tag that keeps the original PC and EPC.
    #[test]
    fn test_decoding_is_total(
        pc in any::<[u8; 2]>(),
        epc in proptest::collection::vec(any::<u8>(), 0..40),
    ) {
        let factory = TagFactory::default();
        let tag = factory.create_tag(Some(pc), Some(&epc));
        prop_assert_eq!(tag.pc(), pc);
        prop_assert_eq!(tag.epc(), &epc[..]);
    }

    /// The same input always decodes to the same tag.
    #[test]
    fn test_decoding_is_deterministic(epc in proptest::collection::vec(any::<u8>(), 0..40)) {
        let factory = TagFactory::default();
        let first = factory.create_tag(None, Some(&epc));
        let second = factory.create_tag(None, Some(&epc));
        prop_assert_eq!(first, second);
    }

    /// EPCs shorter than a format header always fall back to raw.
    #[test]
    fn test_short_epcs_are_raw(epc in proptest::collection::vec(any::<u8>(), 0..4)) {
        let factory = TagFactory::default();
        let tag = factory.create_tag(None, Some(&epc));
        prop_assert!(matches!(tag, Tag::Raw(_)));
    }

    /// Every created tag re-encodes to exactly the bytes it was read from,
    /// whether it was decoded or kept raw.
    #[test]
    fn test_reencoding_restores_input(epc in proptest::collection::vec(any::<u8>(), 0..40)) {
        let factory = TagFactory::default();
        let tag = factory.create_tag(None, Some(&epc));
        prop_assert_eq!(tag.encode_epc(), tag.epc());
    }

    /// Well-formed DE290/CD290 EPCs decode to the numeric model and
    /// re-encode byte-identically.
    #[test]
    fn test_de290_roundtrip(
        digits in "[0-9]{10}",
        media in any::<u8>(),
        branch in any::<u8>(),
        flags in any::<u8>(),
        alias in any::<bool>(),
    ) {
        let mut epc = if alias {
            vec![0xCD, 0x29, 0x00, 0x01]
        } else {
            vec![0xDE, 0x29, 0x00, 0x01]
        };
        epc.extend(digits_to_bcd(&digits));
        epc.extend([media, branch, flags]);

        let factory = TagFactory::default();
        let tag = factory.create_tag(None, Some(&epc));
        if let Tag::De290(tag) = &tag {
            prop_assert_eq!(tag.item_number(), digits.as_str());
            prop_assert_eq!(tag.encode_epc(), epc);
        } else {
            prop_assert!(false, "expected a DE290 tag, got {:?}", tag);
        }
    }

    /// Well-formed DE6 EPCs decode to the short numeric model and re-encode
    /// byte-identically.
    #[test]
    fn test_de6_roundtrip(digits in "[0-9]{8}") {
        let mut epc = vec![0xDE, 0x06, 0x00, 0x01];
        epc.extend(digits_to_bcd(&digits));

        let factory = TagFactory::default();
        let tag = factory.create_tag(None, Some(&epc));
        if let Tag::De6(tag) = &tag {
            prop_assert_eq!(tag.item_number(), digits.as_str());
            prop_assert_eq!(tag.encode_epc(), epc);
        } else {
            prop_assert!(false, "expected a DE6 tag, got {:?}", tag);
        }
    }

    /// Well-formed ASCII-scheme EPCs keep their identifier and padding.
    #[test]
    fn test_ascii_roundtrip(
        scheme_idx in 0usize..3,
        ident in "[A-Z0-9 .:-]{1,12}",
        padding in 0usize..8,
    ) {
        let headers: [&[u8; 4]; 3] = [b"D386", b"D385", b"LAN1"];
        let mut epc = headers[scheme_idx].to_vec();
        epc.extend_from_slice(ident.as_bytes());
        epc.extend(std::iter::repeat(0u8).take(padding));

        let factory = TagFactory::default();
        let tag = factory.create_tag(None, Some(&epc));
        if let Tag::Ascii(tag) = &tag {
            prop_assert_eq!(tag.item_id(), ident.as_str());
            prop_assert_eq!(tag.encode_epc(), epc);
        } else {
            prop_assert!(false, "expected an ASCII tag, got {:?}", tag);
        }
    }

    /// Well-formed barcode EPCs keep their barcode and padding.
    #[test]
    fn test_barcode_roundtrip(
        barcode in "[0-9A-Z]{4,12}",
        padding in 0usize..6,
    ) {
        let mut epc = vec![0x42];
        epc.extend_from_slice(barcode.as_bytes());
        epc.extend(std::iter::repeat(0u8).take(padding));

        let factory = TagFactory::default();
        let tag = factory.create_tag(None, Some(&epc));
        if let Tag::Barcode(tag) = &tag {
            prop_assert_eq!(tag.barcode(), barcode.as_str());
            prop_assert_eq!(tag.encode_epc(), epc);
        } else {
            prop_assert!(false, "expected a barcode tag, got {:?}", tag);
        }
    }

    /// Hex decoding accepts whatever hex encoding produced, in any case.
    #[test]
    fn test_hex_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..32)) {
        let upper = bytes_to_hex(&bytes);
        prop_assert_eq!(hex_to_bytes(&upper).unwrap(), bytes.clone());
        prop_assert_eq!(hex_to_bytes(&upper.to_lowercase()).unwrap(), bytes);
    }
}
