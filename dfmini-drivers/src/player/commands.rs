//! One method per module command
//!
//! Each method only places its arguments into DATA_HIGH/DATA_LOW. Nothing
//! is range-checked here; the module answers out-of-range values with an
//! error frame.
//!
//! Track numbers refer to file name prefixes on the module's storage
//! (`0001.mp3`, `01/001.mp3`, `mp3/0001.mp3`, ...). Plain track numbers
//! follow the order the files were copied, not their names.

use dfmini_hal::uart::{UartRx, UartTx};
use dfmini_protocol::{Command, Equalizer, PlaybackSource, Query};
use embedded_hal::delay::DelayNs;

use super::{DfPlayer, PlayerError};

impl<TX, RX, D, E> DfPlayer<TX, RX, D>
where
    TX: UartTx<Error = E>,
    RX: UartRx<Error = E>,
    D: DelayNs,
{
    fn send_track(&mut self, command: Command, track: u16) -> Result<(), PlayerError<E>> {
        let [high, low] = track.to_be_bytes();
        self.send(command, high, low)
    }

    pub fn play_next(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::PlayNext, 0, 0)
    }

    pub fn play_previous(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::PlayPrevious, 0, 0)
    }

    /// Play track 1..3000 (9999 on some chips) in copy order
    pub fn play_track(&mut self, track: u16) -> Result<(), PlayerError<E>> {
        self.send_track(Command::PlayTrack, track)
    }

    pub fn volume_up(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::VolumeUp, 0, 0)
    }

    pub fn volume_down(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::VolumeDown, 0, 0)
    }

    /// Set volume, 0..30
    pub fn set_volume(&mut self, volume: u8) -> Result<(), PlayerError<E>> {
        self.send(Command::SetVolume, 0, volume)
    }

    pub fn set_equalizer(&mut self, preset: Equalizer) -> Result<(), PlayerError<E>> {
        self.send(Command::SetEqualizer, 0, preset.to_byte())
    }

    /// Play and loop track 1..9999
    pub fn repeat_track(&mut self, track: u16) -> Result<(), PlayerError<E>> {
        self.send_track(Command::RepeatTrack, track)
    }

    pub fn set_source(&mut self, source: PlaybackSource) -> Result<(), PlayerError<E>> {
        self.send(Command::SetSource, 0, source.to_byte())
    }

    /// Standby; not the same as the chip's deep sleep source
    pub fn sleep(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::Sleep, 0, 0)
    }

    pub fn wake(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::Wake, 0, 0)
    }

    /// Reset to factory settings; the module answers with a ready frame
    pub fn reset(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::Reset, 0, 0)
    }

    pub fn play(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::Play, 0, 0)
    }

    pub fn pause(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::Pause, 0, 0)
    }

    /// Play track 1..255 from folder 1..99
    pub fn play_folder(&mut self, folder: u8, track: u8) -> Result<(), PlayerError<E>> {
        self.send(Command::PlayFolder, folder, track)
    }

    pub fn set_dac_gain(&mut self, enable: bool, gain: u8) -> Result<(), PlayerError<E>> {
        self.send(Command::SetDacGain, enable as u8, gain)
    }

    pub fn repeat_all(&mut self, enable: bool) -> Result<(), PlayerError<E>> {
        self.send(Command::RepeatAll, 0, enable as u8)
    }

    pub fn play_mp3_folder(&mut self, track: u16) -> Result<(), PlayerError<E>> {
        self.send_track(Command::PlayMp3Folder, track)
    }

    /// Interrupt the current track with an advert, then resume it
    pub fn play_advert_folder(&mut self, track: u16) -> Result<(), PlayerError<E>> {
        self.send_track(Command::PlayAdvertFolder, track)
    }

    /// Play track 1..3000 from folder 1..15
    ///
    /// Folder goes in the top four bits, track in the lower twelve.
    pub fn play_3000_folder(&mut self, folder: u8, track: u16) -> Result<(), PlayerError<E>> {
        let value = ((folder as u16 & 0x0F) << 12) | (track & 0x0FFF);
        self.send_track(Command::Play3000Folder, value)
    }

    pub fn stop_advert_folder(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::StopAdvertFolder, 0, 0)
    }

    pub fn stop(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::Stop, 0, 0)
    }

    pub fn repeat_folder(&mut self, folder: u8) -> Result<(), PlayerError<E>> {
        self.send(Command::RepeatFolder, 0, folder)
    }

    pub fn random_all(&mut self) -> Result<(), PlayerError<E>> {
        self.send(Command::RandomAll, 0, 0)
    }

    pub fn loop_current_track(&mut self, enable: bool) -> Result<(), PlayerError<E>> {
        // 0 starts looping, 1 stops it
        self.send(Command::LoopCurrentTrack, 0, !enable as u8)
    }

    pub fn enable_dac(&mut self, enable: bool) -> Result<(), PlayerError<E>> {
        // 0 enables the DAC
        self.send(Command::EnableDac, 0, !enable as u8)
    }

    /// Interrupt the current track with track 1..255 from "advertN"
    pub fn play_advert_folder_n(&mut self, folder: u8, track: u8) -> Result<(), PlayerError<E>> {
        self.send(Command::PlayAdvertFolderN, folder, track)
    }

    /// Source in the high byte, playback state in the low byte
    pub fn status(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::Status)
    }

    pub fn volume(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::Volume)
    }

    pub fn equalizer(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::Equalizer)
    }

    pub fn play_mode(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::PlayMode)
    }

    pub fn firmware_version(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::Version)
    }

    pub fn usb_file_count(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::UsbFileCount)
    }

    pub fn sd_file_count(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::SdFileCount)
    }

    pub fn flash_file_count(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::FlashFileCount)
    }

    pub fn usb_track(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::UsbTrack)
    }

    pub fn sd_track(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::SdTrack)
    }

    pub fn flash_track(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::FlashTrack)
    }

    pub fn folder_file_count(&mut self, folder: u8) -> Result<Option<u16>, PlayerError<E>> {
        self.query_with(Query::FolderFileCount, 0, folder)
    }

    pub fn folder_count(&mut self) -> Result<Option<u16>, PlayerError<E>> {
        self.query(Query::FolderCount)
    }
}
