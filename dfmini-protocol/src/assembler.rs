//! Byte-at-a-time frame reassembly
//!
//! The assembler is fed one received byte at a time, typically from the
//! UART receive interrupt. It does no blocking and no allocation, and every
//! call is O(1).
//!
//! Resynchronization is done on the start marker only: while no frame is
//! in progress, anything other than 0x7E is dropped. There is no timeout;
//! if the line goes quiet mid-frame the assembler waits at its cursor until
//! more bytes arrive or [`FrameAssembler::reset`] is called.

use crate::checksum::ModuleVariant;
use crate::frame::{RawFrame, FRAME_SIZE, FRAME_START};

/// Externally visible assembler state
///
/// A completed frame is never a resting state: it is handed out by
/// [`FrameAssembler::feed`] and the assembler is back to `AwaitingStart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblerState {
    /// Waiting for the START byte
    AwaitingStart,
    /// Inside a frame, holding this many bytes
    Accumulating(usize),
}

/// Frame reassembly state machine
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    buffer: [u8; FRAME_SIZE],
    cursor: usize,
    frame_len: usize,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(ModuleVariant::default())
    }
}

impl FrameAssembler {
    /// Create an assembler for frames of the given variant's length
    pub const fn new(variant: ModuleVariant) -> Self {
        let frame_len = match variant {
            ModuleVariant::NoChecksum => FRAME_SIZE - 2,
            _ => FRAME_SIZE,
        };
        Self {
            buffer: [0; FRAME_SIZE],
            cursor: 0,
            frame_len,
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Current write position in the receive buffer
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current state
    pub fn state(&self) -> AssemblerState {
        match self.cursor {
            0 => AssemblerState::AwaitingStart,
            n => AssemblerState::Accumulating(n),
        }
    }

    /// Number of bytes that make up one frame
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Feed a single byte
    ///
    /// Returns the complete frame when this byte finishes one. The frame is
    /// copied out, so the next frame can reuse the buffer freely.
    pub fn feed(&mut self, byte: u8) -> Option<RawFrame> {
        if self.cursor == 0 && byte != FRAME_START {
            return None;
        }

        self.buffer[self.cursor] = byte;
        self.cursor += 1;

        if self.cursor < self.frame_len {
            return None;
        }

        self.cursor = 0;
        RawFrame::from_slice(&self.buffer[..self.frame_len])
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete frame found, if any. Bytes after a
    /// complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<RawFrame> {
        bytes.iter().find_map(|&byte| self.feed(byte))
    }
}
