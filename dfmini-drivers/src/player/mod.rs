//! DFPlayer MP3 module driver
//!
//! The module is driven over a 9600 8N1 UART with fixed-size frames (see
//! `dfmini-protocol`). Commands are fire-and-forget; replies come back
//! either as the answer to a query or as unsolicited status frames.
//!
//! # Reception modes
//!
//! The receive half of the UART is a capability held by exactly one side:
//!
//! - `Polling`: the driver owns `RX` and reads frames synchronously
//!   ([`DfPlayer::query`], [`DfPlayer::wait_for_ready`]).
//! - `Interrupt`: `RX` has been handed out with [`DfPlayer::release_rx`]
//!   to the UART interrupt, which feeds bytes to an [`RxHandler`].
//!   Synchronous reads fail with [`PlayerError::RxReleased`] until the
//!   receive half is returned with [`DfPlayer::attach_rx`].

mod commands;
mod receiver;

pub use receiver::{EventQueue, EventReader, RxHandler};

use dfmini_hal::uart::{UartRx, UartTx};
use dfmini_protocol::{
    match_query, Command, Event, Frame, FrameAssembler, FrameError, ModuleVariant, Query,
};
use embedded_hal::delay::DelayNs;

use crate::config::PlayerConfig;

/// Player errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError<E> {
    /// UART transmit or receive failed
    Uart(E),
    /// The receive half is owned by the interrupt side
    RxReleased,
    /// A received frame failed verification
    Frame(FrameError),
    /// The expected frame did not arrive within the frame budget
    NoResponse,
}

/// Who currently reads the receive half
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceptionMode {
    /// Foreground reads frames synchronously
    Polling,
    /// Bytes are consumed by the UART interrupt
    Interrupt,
}

/// DFPlayer driver
pub struct DfPlayer<TX, RX, D> {
    tx: TX,
    rx: Option<RX>,
    delay: D,
    config: PlayerConfig,
}

impl<TX, RX, D, E> DfPlayer<TX, RX, D>
where
    TX: UartTx<Error = E>,
    RX: UartRx<Error = E>,
    D: DelayNs,
{
    /// Create a new driver in polling mode
    pub fn new(tx: TX, rx: RX, delay: D, config: PlayerConfig) -> Self {
        Self {
            tx,
            rx: Some(rx),
            delay,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Chip family this driver was configured for
    pub fn variant(&self) -> ModuleVariant {
        self.config.variant
    }

    /// Current reception mode
    pub fn mode(&self) -> ReceptionMode {
        if self.rx.is_some() {
            ReceptionMode::Polling
        } else {
            ReceptionMode::Interrupt
        }
    }

    /// Give the module time to boot after power-up
    pub fn begin(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Waiting {} ms for player boot", self.config.boot_delay_ms);
        self.delay.delay_ms(self.config.boot_delay_ms);
    }

    /// Hand the receive half to the interrupt side
    ///
    /// Returns `None` if it was already released.
    pub fn release_rx(&mut self) -> Option<RX> {
        let rx = self.rx.take();
        #[cfg(feature = "defmt")]
        if rx.is_some() {
            defmt::debug!("Player RX switched to interrupt reception");
        }
        rx
    }

    /// Take the receive half back for synchronous reads
    ///
    /// The caller must have disabled the receive interrupt first.
    pub fn attach_rx(&mut self, rx: RX) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Player RX switched to polling reception");
        self.rx = Some(rx);
    }

    /// Send a command with its two parameter bytes
    pub fn send(
        &mut self,
        command: Command,
        data_high: u8,
        data_low: u8,
    ) -> Result<(), PlayerError<E>> {
        self.send_opcode(command.opcode(), data_high, data_low)
    }

    fn send_opcode(
        &mut self,
        opcode: u8,
        data_high: u8,
        data_low: u8,
    ) -> Result<(), PlayerError<E>> {
        let frame = Frame::command(opcode, data_high, data_low).feedback(self.config.feedback);
        self.send_frame(&frame)
    }

    /// Encode and transmit a frame
    ///
    /// Slow chip families get their settle delay after the last byte has
    /// left the UART.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), PlayerError<E>> {
        let raw = frame.encode(self.config.variant);

        #[cfg(feature = "defmt")]
        defmt::trace!("TX: {=[u8]:x}", raw.as_bytes());

        self.tx.write_blocking(raw.as_bytes()).map_err(PlayerError::Uart)?;

        if let Some(delay_ms) = self.config.variant.post_send_delay_ms() {
            self.tx.flush().map_err(PlayerError::Uart)?;
            self.delay.delay_ms(delay_ms);
        }

        Ok(())
    }

    /// Block until one complete frame has been received
    ///
    /// Bytes before the start marker are skipped. There is no timeout: a
    /// silent module blocks here unless the UART implementation reports
    /// one as an error.
    pub fn read_frame(&mut self) -> Result<Frame, PlayerError<E>> {
        let variant = self.config.variant;
        let policy = self.config.rx_checksum;
        let rx = self.rx.as_mut().ok_or(PlayerError::RxReleased)?;

        let mut assembler = FrameAssembler::new(variant);
        loop {
            let byte = rx.read_byte().map_err(PlayerError::Uart)?;
            if let Some(raw) = assembler.feed(byte) {
                #[cfg(feature = "defmt")]
                defmt::trace!("RX: {=[u8]:x}", raw.as_bytes());
                return Frame::decode(&raw, variant, policy).map_err(PlayerError::Frame);
            }
        }
    }

    /// Send a query and read the answer
    ///
    /// Returns `Ok(None)` when the frame that comes back is for another
    /// opcode; that is indistinguishable from no answer.
    pub fn query(&mut self, query: Query) -> Result<Option<u16>, PlayerError<E>> {
        self.query_with(query, 0, 0)
    }

    /// Send a query carrying parameters and read the answer
    pub fn query_with(
        &mut self,
        query: Query,
        data_high: u8,
        data_low: u8,
    ) -> Result<Option<u16>, PlayerError<E>> {
        if self.rx.is_none() {
            return Err(PlayerError::RxReleased);
        }

        self.send_opcode(query.opcode(), data_high, data_low)?;
        let frame = self.read_frame()?;
        let value = match_query(&frame, query.opcode());

        #[cfg(feature = "defmt")]
        if value.is_none() {
            defmt::warn!(
                "Query {:?} answered with opcode {=u8:#x}",
                query,
                frame.opcode
            );
        }

        Ok(value)
    }

    /// Read frames until the module reports ready
    ///
    /// Other frames are discarded, and so are corrupt ones when checksum
    /// verification is on. Fails with [`PlayerError::NoResponse`] once
    /// `ready_frame_budget` frames went by without a ready frame.
    pub fn wait_for_ready(&mut self) -> Result<(), PlayerError<E>> {
        for _ in 0..self.config.ready_frame_budget {
            match self.read_frame() {
                Ok(frame) => {
                    if Event::from_frame(&frame) == Some(Event::Ready) {
                        return Ok(());
                    }
                }
                Err(PlayerError::Frame(_e)) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Dropping corrupt frame while waiting for ready: {:?}", _e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(PlayerError::NoResponse)
    }

    /// Reset the module and wait for it to come back
    pub fn reset_and_wait(&mut self) -> Result<(), PlayerError<E>> {
        self.reset()?;
        self.wait_for_ready()
    }

    /// Release the hardware
    pub fn release(self) -> (TX, Option<RX>, D) {
        (self.tx, self.rx, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockError, MockRx, MockTx};
    use dfmini_protocol::RxChecksum;

    type TestPlayer = DfPlayer<MockTx, MockRx, MockDelay>;

    fn player(config: PlayerConfig, incoming: &[u8]) -> TestPlayer {
        DfPlayer::new(MockTx::new(), MockRx::new(incoming), MockDelay::new(), config)
    }

    #[test]
    fn test_send_set_volume_standard() {
        let mut player = player(PlayerConfig::default(), &[]);
        player.send(Command::SetVolume, 0x00, 0x0F).unwrap();

        let (tx, _, delay) = player.release();
        assert_eq!(
            tx.sent(),
            &[0x7E, 0xFF, 0x06, 0x06, 0x01, 0x00, 0x0F, 0xFE, 0xE5, 0xEF]
        );
        assert_eq!(delay.total_ms(), 0);
    }

    #[test]
    fn test_send_no_checksum() {
        let mut player = player(PlayerConfig::for_variant(ModuleVariant::NoChecksum), &[]);
        player.send(Command::PlayNext, 0, 0).unwrap();

        let (tx, _, _) = player.release();
        assert_eq!(tx.sent(), &[0x7E, 0xFF, 0x06, 0x01, 0x01, 0x00, 0x00, 0xEF]);
    }

    #[test]
    fn test_slow_chip_waits_after_send() {
        let mut player = player(PlayerConfig::for_variant(ModuleVariant::SlowChip), &[]);
        player.send(Command::Play, 0, 0).unwrap();
        player.send(Command::Pause, 0, 0).unwrap();

        let (tx, _, delay) = player.release();
        assert_eq!(tx.sent().len(), 20);
        assert_eq!(tx.flushes(), 2);
        assert_eq!(delay.total_ms(), 700);
    }

    #[test]
    fn test_feedback_disabled() {
        let config = PlayerConfig {
            feedback: false,
            ..PlayerConfig::default()
        };
        let mut player = player(config, &[]);
        player.send(Command::Stop, 0, 0).unwrap();

        let (tx, _, _) = player.release();
        assert_eq!(tx.sent()[4], 0x00);
    }

    #[test]
    fn test_query_volume() {
        let reply = Frame::command(0x43, 0x00, 0x14).encode(ModuleVariant::Standard);
        let mut player = player(PlayerConfig::default(), reply.as_bytes());

        assert_eq!(player.query(Query::Volume), Ok(Some(20)));

        let (tx, _, _) = player.release();
        assert_eq!(tx.sent()[3], 0x43);
    }

    #[test]
    fn test_query_mismatch_is_absent() {
        let done = Frame::command(0x3D, 0x00, 0x07).encode(ModuleVariant::Standard);
        let mut player = player(PlayerConfig::default(), done.as_bytes());

        assert_eq!(player.query(Query::Volume), Ok(None));
    }

    #[test]
    fn test_query_skips_leading_garbage() {
        let reply = Frame::command(0x48, 0x00, 0x2A).encode(ModuleVariant::Standard);
        let mut incoming: heapless::Vec<u8, 16> = heapless::Vec::new();
        incoming.extend_from_slice(&[0x00, 0xEF, 0x12]).unwrap();
        incoming.extend_from_slice(reply.as_bytes()).unwrap();
        let mut player = player(PlayerConfig::default(), &incoming);

        assert_eq!(player.sd_file_count(), Ok(Some(42)));
    }

    #[test]
    fn test_query_propagates_uart_error() {
        let mut player = player(PlayerConfig::default(), &[0x7E, 0xFF]);
        assert_eq!(
            player.query(Query::Volume),
            Err(PlayerError::Uart(MockError::Empty))
        );
    }

    #[test]
    fn test_query_rejects_corrupt_frame_when_verifying() {
        let config = PlayerConfig {
            rx_checksum: RxChecksum::Verify,
            ..PlayerConfig::default()
        };
        let corrupt = [0x7E, 0xFF, 0x06, 0x43, 0x01, 0x00, 0x14, 0x00, 0x00, 0xEF];
        let mut player = player(config, &corrupt);

        assert_eq!(
            player.query(Query::Volume),
            Err(PlayerError::Frame(FrameError::InvalidChecksum))
        );
    }

    #[test]
    fn test_released_rx_blocks_synchronous_reads() {
        let reply = Frame::command(0x43, 0x00, 0x14).encode(ModuleVariant::Standard);
        let mut player = player(PlayerConfig::default(), reply.as_bytes());

        let rx = player.release_rx().unwrap();
        assert_eq!(player.mode(), ReceptionMode::Interrupt);
        assert!(player.release_rx().is_none());
        assert_eq!(player.query(Query::Volume), Err(PlayerError::RxReleased));
        assert_eq!(player.read_frame(), Err(PlayerError::RxReleased));

        // Nothing was sent for the refused query
        player.attach_rx(rx);
        assert_eq!(player.mode(), ReceptionMode::Polling);
        assert_eq!(player.query(Query::Volume), Ok(Some(20)));
        let (tx, _, _) = player.release();
        assert_eq!(tx.sent().len(), 10);
    }

    #[test]
    fn test_reset_and_wait_for_ready() {
        let mut incoming: heapless::Vec<u8, 32> = heapless::Vec::new();
        incoming
            .extend_from_slice(Frame::command(0x41, 0, 0).encode(ModuleVariant::Standard).as_bytes())
            .unwrap();
        incoming
            .extend_from_slice(Frame::command(0x3F, 0, 2).encode(ModuleVariant::Standard).as_bytes())
            .unwrap();
        let mut player = player(PlayerConfig::default(), &incoming);

        assert_eq!(player.reset_and_wait(), Ok(()));
        let (tx, _, _) = player.release();
        assert_eq!(tx.sent()[3], 0x0C);
    }

    #[test]
    fn test_wait_for_ready_gives_up() {
        let config = PlayerConfig {
            ready_frame_budget: 1,
            ..PlayerConfig::default()
        };
        let ack = Frame::command(0x41, 0, 0).encode(ModuleVariant::Standard);
        let mut player = player(config, ack.as_bytes());

        assert_eq!(player.wait_for_ready(), Err(PlayerError::NoResponse));
    }

    #[test]
    fn test_begin_waits_boot_delay() {
        let mut player = player(PlayerConfig::default(), &[]);
        player.begin();
        let (_, _, delay) = player.release();
        assert_eq!(delay.total_ms(), 3000);
    }
}
