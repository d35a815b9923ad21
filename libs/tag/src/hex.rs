//! EPC hex string codec.
//!
//! Hex strings arrive from provisioning tools and HTTP payloads, so the
//! decoder is forgiving about spelling: ASCII whitespace anywhere in the
//! string is stripped and lowercase digits are accepted. After normalization
//! the string must be non-empty, even-length and contain only hex digits.

use crate::{Result, TagError};

/// Decode an EPC hex string into bytes.
///
/// # Errors
///
/// Returns [`TagError::EmptyHex`], [`TagError::InvalidHexCharacter`] or
/// [`TagError::OddHexLength`] when the normalized string is not valid hex.
pub fn hex_to_bytes(epc_hex: &str) -> Result<Vec<u8>> {
    let normalized = normalize(epc_hex);
    if normalized.is_empty() {
        return Err(TagError::EmptyHex);
    }
    if let Some((index, character)) = normalized
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(TagError::InvalidHexCharacter { character, index });
    }
    if normalized.len() % 2 != 0 {
        return Err(TagError::OddHexLength {
            length: normalized.len(),
        });
    }
    // Charset and parity were checked above, so decode cannot fail here.
    hex::decode(&normalized).map_err(|_| TagError::OddHexLength {
        length: normalized.len(),
    })
}

/// Encode bytes as an uppercase hex string without separators.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_hex() {
        assert_eq!(hex_to_bytes("DE290001").unwrap(), [0xDE, 0x29, 0x00, 0x01]);
    }

    #[test]
    fn test_decode_normalizes_case_and_whitespace() {
        assert_eq!(
            hex_to_bytes(" de 29\t00 01\n").unwrap(),
            [0xDE, 0x29, 0x00, 0x01]
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(hex_to_bytes(""), Err(TagError::EmptyHex));
        assert_eq!(hex_to_bytes("  \t "), Err(TagError::EmptyHex));
    }

    #[test]
    fn test_invalid_character_rejected() {
        assert_eq!(
            hex_to_bytes("3000G1"),
            Err(TagError::InvalidHexCharacter {
                character: 'G',
                index: 4
            })
        );
    }

    #[test]
    fn test_invalid_character_reported_before_parity() {
        // Mirrors the validation order of the original service: charset
        // first, then length parity.
        assert_eq!(
            hex_to_bytes("3000G"),
            Err(TagError::InvalidHexCharacter {
                character: 'G',
                index: 4
            })
        );
    }

    #[test]
    fn test_odd_length_rejected() {
        assert_eq!(hex_to_bytes("300"), Err(TagError::OddHexLength { length: 3 }));
    }

    #[test]
    fn test_encode_is_uppercase() {
        assert_eq!(bytes_to_hex(&[0xDE, 0x29, 0x00, 0x0F]), "DE29000F");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn test_roundtrip() {
        let bytes = vec![0x00, 0x42, 0xFF, 0x1A];
        assert_eq!(hex_to_bytes(&bytes_to_hex(&bytes)).unwrap(), bytes);
    }
}
