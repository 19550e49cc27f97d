//! DFPlayer UART Protocol
//!
//! This crate implements the serial protocol spoken by DFPlayer Mini class
//! MP3 modules and their clones. Every command and every response is a
//! fixed-size frame:
//!
//! ```text
//! ┌───────┬─────┬─────┬────────┬─────┬────┬────┬──────────┬─────┐
//! │ START │ VER │ LEN │ OPCODE │ ACK │ DH │ DL │ CHECKSUM │ END │
//! │ 0x7E  │ 0xFF│ 0x06│ 1B     │ 1B  │ 1B │ 1B │ 2B (BE)  │ 0xEF│
//! └───────┴─────┴─────┴────────┴─────┴────┴────┴──────────┴─────┘
//! ```
//!
//! The checksum seed depends on the chip family inside the module (see
//! [`ModuleVariant`]); the no-checksum mode drops the two checksum bytes.
//!
//! Components:
//! - [`checksum`] - per-variant checksum policy
//! - [`frame`] - frame encoding and decoding
//! - [`assembler`] - byte-at-a-time frame reassembly, safe to run in an ISR
//! - [`response`] - response interpretation and decoded status
//! - [`commands`] - command and query opcode tables

#![no_std]
#![deny(unsafe_code)]

pub mod assembler;
pub mod checksum;
pub mod commands;
pub mod frame;
pub mod response;

pub use assembler::{AssemblerState, FrameAssembler};
pub use checksum::ModuleVariant;
pub use commands::{Command, Equalizer, PlayMode, PlaybackSource, Query};
pub use frame::{
    Frame, FrameError, RawFrame, RxChecksum, ACK_FEEDBACK, FRAME_END, FRAME_LENGTH, FRAME_SIZE,
    FRAME_SIZE_NO_CHECKSUM, FRAME_START, FRAME_VERSION,
};
pub use response::{match_query, DecodedStatus, ErrorCode, Event, PlaybackState};
