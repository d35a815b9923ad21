//! Fallback representation for tags no decoder understands.

/// An undecoded tag preserving the original PC and EPC bytes.
///
/// This is where every unrecognized header, too-short EPC and malformed body
/// ends up. It carries no passwords and no interpretation; re-encoding
/// returns the stored bytes unchanged, so inventory paths still see the tag
/// exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pc: [u8; 2],
    epc: Vec<u8>,
}

impl RawTag {
    pub fn new(pc: [u8; 2], epc: Vec<u8>) -> Self {
        Self { pc, epc }
    }

    /// Protocol Control word as read from the tag.
    pub fn pc(&self) -> [u8; 2] {
        self.pc
    }

    /// EPC bytes as read from the tag.
    pub fn epc(&self) -> &[u8] {
        &self.epc
    }

    /// Returns the stored EPC bytes unchanged.
    pub fn encode_epc(&self) -> Vec<u8> {
        self.epc.clone()
    }
}
