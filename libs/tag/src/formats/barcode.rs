//! Barcode data model: an item barcode written directly into EPC memory.
//!
//! Unlike every other format this one has no 4-byte header. A barcode EPC is
//! a single sentinel byte followed by the barcode characters, 0x00-padded to
//! the EPC length:
//!
//! ```text
//! byte  0      sentinel 0x42 (ASCII 'B')
//! bytes 1..    barcode over [0-9A-Z], then zero or more 0x00 padding bytes
//! ```
//!
//! A lone sentinel byte is far too weak a discriminator, so detection also
//! requires the structural shape: at least [`BR_MIN_BARCODE_LEN`] barcode
//! characters and nothing but padding behind them. The factory runs this
//! check only after every 4-byte header pattern has failed to match.

/// Sentinel first byte of a barcode EPC.
pub const BR_SENTINEL: u8 = 0x42;
/// Minimum number of barcode characters for an EPC to count as a barcode tag.
pub const BR_MIN_BARCODE_LEN: usize = 4;

/// Structural validity check for barcode EPCs.
pub fn is_barcode_epc(epc: &[u8]) -> bool {
    parse_barcode(epc).is_some()
}

/// The barcode characters of a structurally valid barcode EPC.
fn parse_barcode(epc: &[u8]) -> Option<&[u8]> {
    let (&sentinel, payload) = epc.split_first()?;
    if sentinel != BR_SENTINEL {
        return None;
    }
    let barcode_len = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    let (barcode, padding) = payload.split_at(barcode_len);
    if barcode.len() < BR_MIN_BARCODE_LEN {
        return None;
    }
    if !barcode
        .iter()
        .all(|&b| b.is_ascii_digit() || b.is_ascii_uppercase())
    {
        return None;
    }
    if padding.iter().any(|&b| b != 0) {
        return None;
    }
    Some(barcode)
}

/// A tag carrying a plain item barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeTag {
    pc: [u8; 2],
    epc: Vec<u8>,
    barcode: String,
    secret_password: String,
}

impl BarcodeTag {
    /// Decode a barcode EPC. Returns `None` unless [`is_barcode_epc`] holds.
    pub fn decode(pc: [u8; 2], epc: &[u8], secret_password: String) -> Option<Self> {
        let barcode = parse_barcode(epc)?;
        let barcode = String::from_utf8(barcode.to_vec()).ok()?;
        Some(Self {
            pc,
            epc: epc.to_vec(),
            barcode,
            secret_password,
        })
    }

    /// Re-encode the EPC from the decoded fields, restoring the original
    /// padding length.
    pub fn encode_epc(&self) -> Vec<u8> {
        let mut epc = Vec::with_capacity(self.epc.len());
        epc.push(BR_SENTINEL);
        epc.extend_from_slice(self.barcode.as_bytes());
        epc.resize(self.epc.len(), 0);
        epc
    }

    pub fn pc(&self) -> [u8; 2] {
        self.pc
    }

    pub fn epc(&self) -> &[u8] {
        &self.epc
    }

    /// The item barcode, without padding.
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    /// Shared secret used when rewriting barcode tags.
    pub fn secret_password(&self) -> &str {
        &self.secret_password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_shape_accepted() {
        assert!(is_barcode_epc(b"B1234"));
        assert!(is_barcode_epc(b"BMEDIA0042"));
        assert!(is_barcode_epc(&[b'B', b'1', b'2', b'3', b'4', 0, 0, 0]));
    }

    #[test]
    fn test_barcode_shape_rejected() {
        // Wrong sentinel.
        assert!(!is_barcode_epc(b"A1234"));
        // Too few characters, with and without padding.
        assert!(!is_barcode_epc(b"B123"));
        assert!(!is_barcode_epc(&[b'B', b'1', b'2', b'3', 0, 0, 0, 0]));
        // Characters outside [0-9A-Z].
        assert!(!is_barcode_epc(b"B12a4"));
        assert!(!is_barcode_epc(b"B12-4"));
        // Data after the padding starts.
        assert!(!is_barcode_epc(&[b'B', b'1', b'2', b'3', b'4', 0, b'5']));
        // Empty and sentinel-only input.
        assert!(!is_barcode_epc(&[]));
        assert!(!is_barcode_epc(&[BR_SENTINEL]));
    }

    #[test]
    fn test_decode_and_roundtrip() {
        let epc = [b'B', b'0', b'4', b'7', b'1', b'1', 0, 0];
        let tag = BarcodeTag::decode([0x20, 0x00], &epc, "sesame".to_string()).unwrap();

        assert_eq!(tag.barcode(), "04711");
        assert_eq!(tag.secret_password(), "sesame");
        assert_eq!(tag.encode_epc(), epc);
    }

    #[test]
    fn test_decode_without_padding() {
        let tag = BarcodeTag::decode([0x20, 0x00], b"BXYZ42", "s".to_string()).unwrap();
        assert_eq!(tag.barcode(), "XYZ42");
        assert_eq!(tag.encode_epc(), b"BXYZ42");
    }
}
