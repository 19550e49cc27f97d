//! Checksum policy per module chip family
//!
//! The checksum covers the six bytes VERSION..DATA_LOW and is sent
//! big-endian. The chip families disagree on the seed:
//!
//! | Variant      | Chip                     | Checksum                  |
//! |--------------|--------------------------|---------------------------|
//! | `Standard`   | YX5200, YX5300, JL AAxx  | `0 - sum`                 |
//! | `Inverted`   | FN6100                   | `0xFFFF - sum + 1`        |
//! | `SlowChip`   | GD3200B, MH2024K         | `0 - sum`                 |
//! | `NoChecksum` | any                      | none, frame is 8 bytes    |
//!
//! All arithmetic is 16-bit and wraps.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::frame::{FRAME_SIZE, FRAME_SIZE_NO_CHECKSUM};

/// Settle time the GD3200B/MH2024K family needs after every command (ms)
pub const SLOW_CHIP_COMMAND_DELAY_MS: u32 = 350;

/// Module chip family
///
/// Fixed for the life of a player; selects the checksum seed, the frame
/// length and whether a post-send delay is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModuleVariant {
    /// DFPlayer Mini, MP3-TF-16P, FN-M16P (YX5200/YX5300/JL AAxxxx)
    #[default]
    Standard,
    /// FN-M10P, FN-S10P (FN6100)
    Inverted,
    /// DFPlayer Mini HW-247A (GD3200B), needs extra spacing between commands
    SlowChip,
    /// No checksum bytes at all
    ///
    /// Not recommended for MCUs running without an external crystal.
    NoChecksum,
}

impl ModuleVariant {
    /// Compute the checksum over VERSION, LENGTH, OPCODE, ACK, DH, DL
    ///
    /// Returns `None` for [`ModuleVariant::NoChecksum`].
    pub fn checksum(&self, body: &[u8; 6]) -> Option<u16> {
        let sum = body
            .iter()
            .fold(0u16, |acc, &byte| acc.wrapping_add(byte as u16));

        match self {
            ModuleVariant::Standard | ModuleVariant::SlowChip => Some(0u16.wrapping_sub(sum)),
            ModuleVariant::Inverted => Some(0xFFFFu16.wrapping_sub(sum).wrapping_add(1)),
            ModuleVariant::NoChecksum => None,
        }
    }

    /// Returns true if frames for this variant carry checksum bytes
    pub fn has_checksum(&self) -> bool {
        !matches!(self, ModuleVariant::NoChecksum)
    }

    /// Number of bytes in a frame for this variant
    pub fn frame_len(&self) -> usize {
        if self.has_checksum() {
            FRAME_SIZE
        } else {
            FRAME_SIZE_NO_CHECKSUM
        }
    }

    /// Delay to hold off after a command has been transmitted, if any
    pub fn post_send_delay_ms(&self) -> Option<u32> {
        match self {
            ModuleVariant::SlowChip => Some(SLOW_CHIP_COMMAND_DELAY_MS),
            _ => None,
        }
    }
}
