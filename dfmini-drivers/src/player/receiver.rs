//! Interrupt-driven reception
//!
//! The UART receive interrupt owns an [`RxHandler`]: it reassembles frames
//! and pushes decoded events into a bounded single-producer,
//! single-consumer queue. The foreground loop owns the matching
//! [`EventReader`], which drains the queue into a [`DecodedStatus`].
//!
//! The interrupt side never blocks and never touches the status; when the
//! queue is full the newest event is dropped and counted.
//!
//! ```text
//!   USART RX IRQ                        main loop
//! ┌──────────────┐   Event queue    ┌──────────────┐
//! │  RxHandler   │ ───────────────► │ EventReader  │
//! │  (assembler) │   (heapless spsc)│ (status)     │
//! └──────────────┘                  └──────────────┘
//! ```

use dfmini_hal::uart::UartRx;
use dfmini_protocol::{DecodedStatus, Event, Frame, FrameAssembler, ModuleVariant, RxChecksum};
use heapless::spsc::{Consumer, Producer, Queue};

use crate::config::PlayerConfig;

/// Backing storage for the event queue
///
/// Holds up to `N - 1` events. Usually placed in a `static` and split once
/// at startup.
pub struct EventQueue<const N: usize> {
    queue: Queue<Event, N>,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
        }
    }

    /// Split into the interrupt half and the foreground half
    pub fn split(&mut self, config: &PlayerConfig) -> (RxHandler<'_, N>, EventReader<'_, N>) {
        let (producer, consumer) = self.queue.split();
        (
            RxHandler {
                assembler: FrameAssembler::new(config.variant),
                variant: config.variant,
                policy: config.rx_checksum,
                producer,
                dropped: 0,
                corrupt: 0,
            },
            EventReader {
                consumer,
                status: DecodedStatus::new(),
            },
        )
    }
}

/// Interrupt-side frame receiver
pub struct RxHandler<'a, const N: usize> {
    assembler: FrameAssembler,
    variant: ModuleVariant,
    policy: RxChecksum,
    producer: Producer<'a, Event, N>,
    dropped: u32,
    corrupt: u32,
}

impl<'a, const N: usize> RxHandler<'a, N> {
    /// Process one received byte
    ///
    /// O(1) and non-blocking. Returns the event that was queued, if this
    /// byte completed a frame the status cares about.
    pub fn on_byte(&mut self, byte: u8) -> Option<Event> {
        let raw = self.assembler.feed(byte)?;

        let frame = match Frame::decode(&raw, self.variant, self.policy) {
            Ok(frame) => frame,
            Err(_e) => {
                self.corrupt = self.corrupt.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::trace!("Dropping frame: {:?}", _e);
                return None;
            }
        };

        let event = Event::from_frame(&frame)?;
        match self.producer.enqueue(event) {
            Ok(()) => Some(event),
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                None
            }
        }
    }

    /// Read one byte from the UART and process it
    ///
    /// Meant to be called from the receive interrupt, when a byte is known
    /// to be waiting.
    pub fn service<RX: UartRx>(&mut self, rx: &mut RX) -> Result<Option<Event>, RX::Error> {
        let byte = rx.read_byte()?;
        Ok(self.on_byte(byte))
    }

    /// Drop any partially received frame
    pub fn resync(&mut self) {
        self.assembler.reset();
    }

    /// Events lost because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Frames rejected by checksum verification
    pub fn corrupt(&self) -> u32 {
        self.corrupt
    }
}

/// Foreground event consumer
pub struct EventReader<'a, const N: usize> {
    consumer: Consumer<'a, Event, N>,
    status: DecodedStatus,
}

impl<'a, const N: usize> EventReader<'a, N> {
    /// Take the next event and fold it into the status
    pub fn poll(&mut self) -> Option<Event> {
        let event = self.consumer.dequeue()?;
        #[cfg(feature = "defmt")]
        defmt::debug!("Player event: {:?}", event);
        self.status.apply(&event);
        Some(event)
    }

    /// Process every queued event, returning how many there were
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.poll().is_some() {
            count += 1;
        }
        count
    }

    /// Events waiting in the queue
    pub fn pending(&self) -> usize {
        self.consumer.len()
    }

    /// Status accumulated so far
    pub fn status(&self) -> &DecodedStatus {
        &self.status
    }

    /// Status accumulated so far, for taking flags
    pub fn status_mut(&mut self) -> &mut DecodedStatus {
        &mut self.status
    }
}
