//! Hardware driver implementations
//!
//! This crate drives the peripherals of the player board through the
//! traits in `dfmini-hal`:
//!
//! - MP3 module over UART ([`player::DfPlayer`]), with interrupt-side frame
//!   reception ([`player::RxHandler`]) feeding a bounded event queue
//! - SSD1306 128x32 OLED over I2C ([`display::Ssd1306`])

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod player;

#[cfg(test)]
mod mock;

pub use config::PlayerConfig;
