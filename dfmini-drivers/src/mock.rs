//! Test doubles for the HAL traits

use dfmini_hal::i2c::I2cBus;
use dfmini_hal::uart::{UartRx, UartTx};
use embedded_hal::delay::DelayNs;
use heapless::{Deque, Vec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// No more scripted bytes to receive
    Empty,
    /// Capture buffer full
    Full,
}

/// Records every transmitted byte
pub struct MockTx {
    sent: Vec<u8, 64>,
    flushes: usize,
}

impl MockTx {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            flushes: 0,
        }
    }

    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl UartTx for MockTx {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.sent
            .extend_from_slice(data)
            .map_err(|_| MockError::Full)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Plays back a scripted byte stream, then reports `Empty`
pub struct MockRx {
    incoming: Deque<u8, 64>,
}

impl MockRx {
    pub fn new(bytes: &[u8]) -> Self {
        let mut incoming = Deque::new();
        for &byte in bytes {
            incoming.push_back(byte).unwrap();
        }
        Self { incoming }
    }
}

impl UartRx for MockRx {
    type Error = MockError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        for slot in buf.iter_mut() {
            *slot = self.incoming.pop_front().ok_or(MockError::Empty)?;
        }
        Ok(buf.len())
    }
}

/// Accumulates requested delay time
pub struct MockDelay {
    total_ms: u32,
    total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self {
            total_ms: 0,
            total_ns: 0,
        }
    }

    pub fn total_ms(&self) -> u32 {
        self.total_ms + (self.total_ns / 1_000_000) as u32
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms;
    }
}

/// Records I2C write transactions
pub struct MockI2c {
    writes: Vec<(u8, Vec<u8, 129>), 64>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    pub fn writes(&self) -> &[(u8, Vec<u8, 129>)] {
        &self.writes
    }

    /// Command bytes sent with a 0x00 control byte, in order
    pub fn commands(&self) -> Vec<u8, 64> {
        self.writes
            .iter()
            .filter(|(_, data)| data.first() == Some(&0x00))
            .flat_map(|(_, data)| data[1..].iter().copied())
            .collect()
    }
}

impl I2cBus for MockI2c {
    type Error = MockError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        let data = Vec::from_slice(data).map_err(|_| MockError::Full)?;
        self.writes.push((address, data)).map_err(|_| MockError::Full)
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        buf.fill(0);
        Ok(())
    }
}
