//! dfmini Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the player stack is
//! written against. Chip-specific code (clock, GPIO and peripheral register
//! setup) lives outside the stack and only has to implement these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (main loop, UI glue)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dfmini-drivers (player, display)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dfmini-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Chip support (USART1 / I2C1 drivers)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial link to the MP3 module
//! - [`i2c::I2cBus`] - I2C bus for the OLED display
//!
//! Millisecond delays use [`embedded_hal::delay::DelayNs`] directly.
//!
//! [`embedded_hal::delay::DelayNs`]: https://docs.rs/embedded-hal/1/embedded_hal/delay/trait.DelayNs.html

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use i2c::{I2cBus, I2cConfig};
pub use uart::{Uart, UartConfig, UartRx, UartTx};
