//! Response interpretation
//!
//! The module answers in two ways:
//! - Query responses (0x42..0x4F) echo the query opcode and carry a 16-bit
//!   value in DATA_HIGH/DATA_LOW.
//! - Status frames arrive unsolicited: ready after boot (0x3F), track done
//!   (0x3D), error (0x40, code in DATA_LOW) and command accepted (0x41).
//!
//! There is no sequence number, so a response is only ever matched by
//! opcode.

use crate::commands::{PlaybackSource, Query};
use crate::frame::Frame;

// Status opcodes
pub const STATUS_DONE: u8 = 0x3D;
pub const STATUS_READY: u8 = 0x3F;
pub const STATUS_ERROR: u8 = 0x40;
pub const STATUS_OK_ACK: u8 = 0x41;

/// Error codes reported in DATA_LOW of an 0x40 frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Module is busy (still initializing)
    Busy,
    /// Module is in sleep mode
    Sleeping,
    /// Serial frame was not received completely
    SerialReceiveError,
    /// Checksum of the command did not match
    ChecksumMismatch,
    /// Track number out of range
    FileIndexOutOfRange,
    /// Track not found
    FileNotFound,
    /// Advert can only be inserted while a track is playing
    AdvertOnlyWhilePlaying,
    /// Storage read failed
    MediaReadFailed,
    /// Module entered sleep mode
    EnteredSleep,
    /// Code not known to this crate
    Other(u8),
}

impl ErrorCode {
    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => ErrorCode::Busy,
            0x02 => ErrorCode::Sleeping,
            0x03 => ErrorCode::SerialReceiveError,
            0x04 => ErrorCode::ChecksumMismatch,
            0x05 => ErrorCode::FileIndexOutOfRange,
            0x06 => ErrorCode::FileNotFound,
            0x07 => ErrorCode::AdvertOnlyWhilePlaying,
            0x08 => ErrorCode::MediaReadFailed,
            0x0A => ErrorCode::EnteredSleep,
            other => ErrorCode::Other(other),
        }
    }
}

/// Playback state reported in DATA_LOW of a status query response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    Other(u8),
}

impl PlaybackState {
    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => PlaybackState::Stopped,
            1 => PlaybackState::Playing,
            2 => PlaybackState::Paused,
            other => PlaybackState::Other(other),
        }
    }
}

/// A decoded inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Module finished booting or resetting
    Ready,
    /// A track finished playing
    PlaybackDone { track: u16 },
    /// The module rejected a command
    Error(ErrorCode),
    /// The module accepted a command
    Ack,
    /// Response to a query
    Data { query: Query, value: u16 },
}

impl Event {
    /// Interpret a frame as an event
    ///
    /// Returns `None` for opcodes outside the status/query table; such
    /// frames carry nothing the status tracks.
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        match frame.opcode {
            STATUS_DONE => Some(Event::PlaybackDone {
                track: frame.data(),
            }),
            STATUS_READY => Some(Event::Ready),
            STATUS_ERROR => Some(Event::Error(ErrorCode::from_byte(frame.data_low))),
            STATUS_OK_ACK => Some(Event::Ack),
            opcode => Query::from_opcode(opcode).map(|query| Event::Data {
                query,
                value: frame.data(),
            }),
        }
    }
}

/// Match a query response against the opcode that was sent
///
/// Returns the DATA_HIGH/DATA_LOW pair on a match. A frame for any other
/// opcode yields `None`, the same as no response at all.
pub fn match_query(frame: &Frame, expected_opcode: u8) -> Option<u16> {
    if frame.opcode == expected_opcode {
        Some(frame.data())
    } else {
        None
    }
}

/// Status accumulated from asynchronous events
///
/// Every field is only ever overwritten by the event that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedStatus {
    ready: bool,
    done: bool,
    ok: bool,
    last_track: Option<u16>,
    last_error: Option<ErrorCode>,
    source: Option<PlaybackSource>,
    playback: Option<PlaybackState>,
}

impl DecodedStatus {
    /// Create an empty status
    pub const fn new() -> Self {
        Self {
            ready: false,
            done: false,
            ok: false,
            last_track: None,
            last_error: None,
            source: None,
            playback: None,
        }
    }

    /// Fold an event into the status
    pub fn apply(&mut self, event: &Event) {
        match *event {
            Event::Ready => self.ready = true,
            Event::PlaybackDone { track } => {
                self.done = true;
                self.last_track = Some(track);
            }
            Event::Error(code) => self.last_error = Some(code),
            Event::Ack => self.ok = true,
            Event::Data {
                query: Query::Status,
                value,
            } => {
                let [source, state] = value.to_be_bytes();
                self.source = Some(PlaybackSource::from_byte(source));
                self.playback = Some(PlaybackState::from_byte(state));
            }
            Event::Data { .. } => {}
        }
    }

    /// Module reported ready since the flag was last taken
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// A track finished since the flag was last taken
    pub fn done(&self) -> bool {
        self.done
    }

    /// A command was acknowledged since the flag was last taken
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Track number from the most recent done frame
    pub fn last_track(&self) -> Option<u16> {
        self.last_track
    }

    /// Most recent error reported by the module
    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }

    /// Most recently reported playback source
    pub fn source(&self) -> Option<PlaybackSource> {
        self.source
    }

    /// Most recently reported playback state
    pub fn playback(&self) -> Option<PlaybackState> {
        self.playback
    }

    /// Read and clear the ready flag
    pub fn take_ready(&mut self) -> bool {
        core::mem::take(&mut self.ready)
    }

    /// Read and clear the done flag
    pub fn take_done(&mut self) -> bool {
        core::mem::take(&mut self.done)
    }

    /// Read and clear the ok flag
    pub fn take_ok(&mut self) -> bool {
        core::mem::take(&mut self.ok)
    }

    /// Read and clear the last error
    pub fn take_error(&mut self) -> Option<ErrorCode> {
        self.last_error.take()
    }
}
