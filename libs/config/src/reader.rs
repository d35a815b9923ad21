//! Per-reader connection settings.

use serde::Deserialize;
use tracing::{debug, warn};

/// Connection and antenna settings for one RFID reader.
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    /// Display name used in logs.
    pub name: String,
    /// Hostname or IP address of the reader.
    pub address: String,
    /// LLRP port, usually 5084.
    pub port: u16,
    /// Operating mode label, interpreted by the reader driver.
    #[serde(default)]
    pub mode: Option<String>,
    /// Antenna indices to enable, 1-based.
    #[serde(default)]
    pub antennas: Vec<u32>,
}

impl ReaderConfig {
    /// Bitmask of enabled antennas: antenna 1 is bit 0, antenna 8 is bit 7.
    ///
    /// Indices outside 1..=8 are skipped with a warning. An empty antenna
    /// list yields mask 0, which drivers treat as "all antennas".
    pub fn antenna_mask(&self) -> u8 {
        let mut mask = 0u8;
        for &antenna in &self.antennas {
            if (1..=8).contains(&antenna) {
                mask |= 1u8 << (antenna - 1);
            } else {
                warn!(reader = %self.name, antenna, "Ignoring invalid antenna index");
            }
        }
        debug!(reader = %self.name, mask, "Computed antenna mask");
        mask
    }
}
