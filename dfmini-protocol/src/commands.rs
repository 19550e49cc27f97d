//! Command and query opcode tables
//!
//! Parameter ranges are documented here but enforced nowhere in the
//! protocol layer; the module ignores or rejects out-of-range values on
//! its own (with an 0x40 error frame).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Commands sent to the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Play next file in upload order
    PlayNext = 0x01,
    /// Play previous file in upload order
    PlayPrevious = 0x02,
    /// Play track 1..3000/9999 in upload order
    PlayTrack = 0x03,
    /// Increment volume by 1
    VolumeUp = 0x04,
    /// Decrement volume by 1
    VolumeDown = 0x05,
    /// Set volume, 0..30
    SetVolume = 0x06,
    /// Set equalizer preset
    SetEqualizer = 0x07,
    /// Play and loop track 1..9999
    RepeatTrack = 0x08,
    /// Select playback source
    SetSource = 0x09,
    /// Standby
    Sleep = 0x0A,
    /// Leave standby (not supported by every chip)
    Wake = 0x0B,
    /// Reset module to factory settings
    Reset = 0x0C,
    /// Resume current track
    Play = 0x0D,
    /// Pause current track
    Pause = 0x0E,
    /// Play track 1..255 from folder 1..99
    PlayFolder = 0x0F,
    /// Set DAC output gain
    SetDacGain = 0x10,
    /// Repeat all files in upload order
    RepeatAll = 0x11,
    /// Play track 1..9999 from the "mp3" folder
    PlayMp3Folder = 0x12,
    /// Interrupt playback with track 1..9999 from the "advert" folder
    PlayAdvertFolder = 0x13,
    /// Play track 1..3000 from a 3000-track folder 1..15
    Play3000Folder = 0x14,
    /// Stop advert and resume the interrupted track
    StopAdvertFolder = 0x15,
    /// Stop playback
    Stop = 0x16,
    /// Repeat folder 1..99
    RepeatFolder = 0x17,
    /// Play all files in random order
    RandomAll = 0x18,
    /// Loop the current track
    LoopCurrentTrack = 0x19,
    /// Mute/unmute the DAC (0 = enabled)
    EnableDac = 0x1A,
    /// Interrupt playback with track 1..255 from "advert1".."advert9"
    PlayAdvertFolderN = 0x25,
}

impl Command {
    /// Every command, in opcode order
    pub const ALL: [Command; 27] = [
        Command::PlayNext,
        Command::PlayPrevious,
        Command::PlayTrack,
        Command::VolumeUp,
        Command::VolumeDown,
        Command::SetVolume,
        Command::SetEqualizer,
        Command::RepeatTrack,
        Command::SetSource,
        Command::Sleep,
        Command::Wake,
        Command::Reset,
        Command::Play,
        Command::Pause,
        Command::PlayFolder,
        Command::SetDacGain,
        Command::RepeatAll,
        Command::PlayMp3Folder,
        Command::PlayAdvertFolder,
        Command::Play3000Folder,
        Command::StopAdvertFolder,
        Command::Stop,
        Command::RepeatFolder,
        Command::RandomAll,
        Command::LoopCurrentTrack,
        Command::EnableDac,
        Command::PlayAdvertFolderN,
    ];

    /// Wire opcode
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Look up a command by opcode
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.opcode() == opcode)
    }
}

/// Queries answered with a data frame carrying the same opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Query {
    /// Current source (DH) and playback state (DL)
    Status = 0x42,
    /// Current volume, 0..30
    Volume = 0x43,
    /// Current equalizer preset
    Equalizer = 0x44,
    /// Current loop mode
    PlayMode = 0x45,
    /// Firmware version
    Version = 0x46,
    /// Number of files on the USB disk
    UsbFileCount = 0x47,
    /// Number of files on the SD card
    SdFileCount = 0x48,
    /// Number of files on NOR flash
    FlashFileCount = 0x49,
    /// Current track on the USB disk
    UsbTrack = 0x4B,
    /// Current track on the SD card
    SdTrack = 0x4C,
    /// Current track on NOR flash
    FlashTrack = 0x4D,
    /// Number of files in a folder
    FolderFileCount = 0x4E,
    /// Number of folders on the current source
    FolderCount = 0x4F,
}

impl Query {
    /// Every query, in opcode order
    pub const ALL: [Query; 13] = [
        Query::Status,
        Query::Volume,
        Query::Equalizer,
        Query::PlayMode,
        Query::Version,
        Query::UsbFileCount,
        Query::SdFileCount,
        Query::FlashFileCount,
        Query::UsbTrack,
        Query::SdTrack,
        Query::FlashTrack,
        Query::FolderFileCount,
        Query::FolderCount,
    ];

    /// Wire opcode
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Look up a query by opcode
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|q| q.opcode() == opcode)
    }
}

/// Equalizer presets (not supported by every chip)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Equalizer {
    #[default]
    Off,
    Pop,
    Rock,
    Jazz,
    Classic,
    Bass,
}

impl Equalizer {
    /// Wire value
    pub fn to_byte(self) -> u8 {
        match self {
            Equalizer::Off => 0,
            Equalizer::Pop => 1,
            Equalizer::Rock => 2,
            Equalizer::Jazz => 3,
            Equalizer::Classic => 4,
            Equalizer::Bass => 5,
        }
    }

    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Equalizer::Off),
            1 => Some(Equalizer::Pop),
            2 => Some(Equalizer::Rock),
            3 => Some(Equalizer::Jazz),
            4 => Some(Equalizer::Classic),
            5 => Some(Equalizer::Bass),
            _ => None,
        }
    }
}

/// Storage the module plays from
///
/// Values 3..6 are chip specific; `Sleep` is what YX5200 reports for 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaybackSource {
    UsbDisk,
    SdCard,
    Aux,
    Sleep,
    NorFlash,
    Other(u8),
}

impl PlaybackSource {
    /// Wire value
    pub fn to_byte(self) -> u8 {
        match self {
            PlaybackSource::UsbDisk => 1,
            PlaybackSource::SdCard => 2,
            PlaybackSource::Aux => 3,
            PlaybackSource::Sleep => 4,
            PlaybackSource::NorFlash => 5,
            PlaybackSource::Other(byte) => byte,
        }
    }

    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => PlaybackSource::UsbDisk,
            2 => PlaybackSource::SdCard,
            3 => PlaybackSource::Aux,
            4 => PlaybackSource::Sleep,
            5 => PlaybackSource::NorFlash,
            other => PlaybackSource::Other(other),
        }
    }
}

/// Loop mode reported by [`Query::PlayMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayMode {
    LoopAll,
    LoopFolder,
    LoopTrack,
    Random,
    Disabled,
}

impl PlayMode {
    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(PlayMode::LoopAll),
            1 => Some(PlayMode::LoopFolder),
            2 => Some(PlayMode::LoopTrack),
            3 => Some(PlayMode::Random),
            4 => Some(PlayMode::Disabled),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_opcodes() {
        assert_eq!(Command::PlayNext.opcode(), 0x01);
        assert_eq!(Command::SetVolume.opcode(), 0x06);
        assert_eq!(Command::Reset.opcode(), 0x0C);
        assert_eq!(Command::EnableDac.opcode(), 0x1A);
        assert_eq!(Command::PlayAdvertFolderN.opcode(), 0x25);
    }

    #[test]
    fn test_command_table_is_contiguous() {
        for (i, command) in Command::ALL[..26].iter().enumerate() {
            assert_eq!(command.opcode(), i as u8 + 1);
        }
    }

    #[test]
    fn test_from_opcode() {
        assert_eq!(Command::from_opcode(0x16), Some(Command::Stop));
        assert_eq!(Command::from_opcode(0x41), None);
        assert_eq!(Query::from_opcode(0x43), Some(Query::Volume));
        assert_eq!(Query::from_opcode(0x4A), None);
    }

    #[test]
    fn test_unknown_source_is_kept() {
        assert_eq!(PlaybackSource::from_byte(2), PlaybackSource::SdCard);
        assert_eq!(PlaybackSource::from_byte(9), PlaybackSource::Other(9));
        assert_eq!(PlaybackSource::Other(9).to_byte(), 9);
    }

    #[test]
    fn test_equalizer_bytes() {
        assert_eq!(Equalizer::Bass.to_byte(), 5);
        assert_eq!(Equalizer::from_byte(2), Some(Equalizer::Rock));
        assert_eq!(Equalizer::from_byte(6), None);
    }
}
