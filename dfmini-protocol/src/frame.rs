//! Frame encoding and decoding
//!
//! Frame format (command and response share it):
//! - START (1 byte): 0x7E
//! - VERSION (1 byte): 0xFF
//! - LENGTH (1 byte): 0x06, bytes from VERSION to DATA_LOW
//! - OPCODE (1 byte): command, query or status code
//! - ACK (1 byte): 0x01 to request a 0x41 acknowledgement
//! - DATA_HIGH, DATA_LOW (2 bytes): parameter, big-endian
//! - CHECKSUM (2 bytes, big-endian): omitted for [`ModuleVariant::NoChecksum`]
//! - END (1 byte): 0xEF

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::checksum::ModuleVariant;

/// Frame start marker
pub const FRAME_START: u8 = 0x7E;

/// Protocol version byte
pub const FRAME_VERSION: u8 = 0xFF;

/// Value of the LENGTH field
pub const FRAME_LENGTH: u8 = 0x06;

/// Frame end marker
pub const FRAME_END: u8 = 0xEF;

/// ACK byte asking the module to answer every command with 0x41
pub const ACK_FEEDBACK: u8 = 0x01;

/// ACK byte for commands sent without feedback
pub const ACK_NONE: u8 = 0x00;

/// Bytes in a checksummed frame
pub const FRAME_SIZE: usize = 10;

/// Bytes in a frame without checksum
pub const FRAME_SIZE_NO_CHECKSUM: usize = FRAME_SIZE - 2;

const OPCODE_OFFSET: usize = 3;
const ACK_OFFSET: usize = 4;
const DATA_HIGH_OFFSET: usize = 5;
const DATA_LOW_OFFSET: usize = 6;
const CHECKSUM_OFFSET: usize = 7;

/// Errors that can occur while decoding a received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// First byte is not the start marker
    InvalidStart,
    /// Last byte is not the end marker
    InvalidEnd,
    /// Byte count does not match the variant's frame length
    BadLength,
    /// Checksum field does not match the recomputed value
    InvalidChecksum,
}

/// How received checksums are treated
///
/// Modules are known to send frames with checksums that were never
/// verified by the stock firmware, so `Ignore` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RxChecksum {
    /// Accept any checksum field
    #[default]
    Ignore,
    /// Reject frames with a wrong checksum or end marker
    Verify,
}

/// Exact wire bytes of one frame
///
/// Always holds a full frame for its variant: 10 bytes, or 8 without
/// checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawFrame {
    bytes: [u8; FRAME_SIZE],
    len: u8,
}

impl RawFrame {
    /// Copy a complete frame out of a receive buffer
    ///
    /// Returns `None` if `bytes` is neither 8 nor 10 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != FRAME_SIZE && bytes.len() != FRAME_SIZE_NO_CHECKSUM {
            return None;
        }
        let mut buf = [0u8; FRAME_SIZE];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }

    /// The frame bytes, ready to transmit
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of bytes on the wire
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// A raw frame is never empty; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// OPCODE field
    pub fn opcode(&self) -> u8 {
        self.bytes[OPCODE_OFFSET]
    }

    /// Checksum field, if the frame carries one
    pub fn checksum(&self) -> Option<u16> {
        if self.len() == FRAME_SIZE {
            Some(u16::from_be_bytes([
                self.bytes[CHECKSUM_OFFSET],
                self.bytes[CHECKSUM_OFFSET + 1],
            ]))
        } else {
            None
        }
    }

    fn body(&self) -> [u8; 6] {
        let mut body = [0u8; 6];
        body.copy_from_slice(&self.bytes[1..=DATA_LOW_OFFSET]);
        body
    }
}

/// Logical content of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command, query or status code
    pub opcode: u8,
    /// ACK byte
    pub ack: u8,
    /// High parameter byte
    pub data_high: u8,
    /// Low parameter byte
    pub data_low: u8,
}

impl Frame {
    /// Create a command frame requesting feedback
    pub fn command(opcode: u8, data_high: u8, data_low: u8) -> Self {
        Self {
            opcode,
            ack: ACK_FEEDBACK,
            data_high,
            data_low,
        }
    }

    /// Create a command frame carrying a 16-bit parameter
    pub fn with_data(opcode: u8, data: u16) -> Self {
        let [data_high, data_low] = data.to_be_bytes();
        Self::command(opcode, data_high, data_low)
    }

    /// Set whether the module should acknowledge this frame
    pub fn feedback(mut self, enabled: bool) -> Self {
        self.ack = if enabled { ACK_FEEDBACK } else { ACK_NONE };
        self
    }

    /// DATA_HIGH and DATA_LOW as one big-endian value
    pub fn data(&self) -> u16 {
        u16::from_be_bytes([self.data_high, self.data_low])
    }

    /// The six checksummed bytes (VERSION..DATA_LOW)
    fn body(&self) -> [u8; 6] {
        [
            FRAME_VERSION,
            FRAME_LENGTH,
            self.opcode,
            self.ack,
            self.data_high,
            self.data_low,
        ]
    }

    /// Encode this frame for the given module variant
    ///
    /// Encoding cannot fail; parameter ranges are the caller's concern.
    pub fn encode(&self, variant: ModuleVariant) -> RawFrame {
        let body = self.body();
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[0] = FRAME_START;
        bytes[1..=DATA_LOW_OFFSET].copy_from_slice(&body);

        let len = match variant.checksum(&body) {
            Some(checksum) => {
                bytes[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&checksum.to_be_bytes());
                bytes[FRAME_SIZE - 1] = FRAME_END;
                FRAME_SIZE
            }
            None => {
                bytes[CHECKSUM_OFFSET] = FRAME_END;
                FRAME_SIZE_NO_CHECKSUM
            }
        };

        RawFrame {
            bytes,
            len: len as u8,
        }
    }

    /// Decode a received frame
    ///
    /// With [`RxChecksum::Ignore`] only the length and start marker are
    /// checked, matching what stock module firmware tolerates. With
    /// [`RxChecksum::Verify`] the end marker and checksum must match too.
    pub fn decode(
        raw: &RawFrame,
        variant: ModuleVariant,
        policy: RxChecksum,
    ) -> Result<Self, FrameError> {
        if raw.len() != variant.frame_len() {
            return Err(FrameError::BadLength);
        }
        let bytes = raw.as_bytes();
        if bytes[0] != FRAME_START {
            return Err(FrameError::InvalidStart);
        }

        if policy == RxChecksum::Verify {
            if bytes[raw.len() - 1] != FRAME_END {
                return Err(FrameError::InvalidEnd);
            }
            if variant.checksum(&raw.body()) != raw.checksum() {
                return Err(FrameError::InvalidChecksum);
            }
        }

        Ok(Self {
            opcode: bytes[OPCODE_OFFSET],
            ack: bytes[ACK_OFFSET],
            data_high: bytes[DATA_HIGH_OFFSET],
            data_low: bytes[DATA_LOW_OFFSET],
        })
    }
}
