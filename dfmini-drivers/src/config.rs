//! Player configuration
//!
//! Chosen once at startup for the module actually fitted to the board.

use dfmini_protocol::{ModuleVariant, RxChecksum};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Typical module boot time; 1500..3000 ms depending on SD card size
pub const BOOT_DELAY_MS: u32 = 3000;

/// Frames read while waiting for the ready frame before giving up
pub const READY_FRAME_BUDGET: u8 = 4;

/// MP3 module configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayerConfig {
    /// Chip family of the fitted module
    pub variant: ModuleVariant,
    /// Ask the module to acknowledge each command with 0x41
    pub feedback: bool,
    /// Treatment of received checksums
    pub rx_checksum: RxChecksum,
    /// Wait after power-up before the first command (ms)
    pub boot_delay_ms: u32,
    /// Frames inspected by [`DfPlayer::wait_for_ready`] before it fails
    ///
    /// [`DfPlayer::wait_for_ready`]: crate::player::DfPlayer::wait_for_ready
    pub ready_frame_budget: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            variant: ModuleVariant::Standard,
            feedback: true,
            rx_checksum: RxChecksum::Ignore,
            boot_delay_ms: BOOT_DELAY_MS,
            ready_frame_budget: READY_FRAME_BUDGET,
        }
    }
}

impl PlayerConfig {
    /// Default configuration for a given chip family
    pub fn for_variant(variant: ModuleVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.variant, ModuleVariant::Standard);
        assert!(config.feedback);
        assert_eq!(config.rx_checksum, RxChecksum::Ignore);
        assert_eq!(config.boot_delay_ms, 3000);
    }

    #[test]
    fn test_for_variant_keeps_defaults() {
        let config = PlayerConfig::for_variant(ModuleVariant::SlowChip);
        assert_eq!(config.variant, ModuleVariant::SlowChip);
        assert_eq!(config.ready_frame_budget, READY_FRAME_BUDGET);
    }
}
