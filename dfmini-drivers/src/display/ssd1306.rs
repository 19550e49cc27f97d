//! SSD1306 OLED Display Driver
//!
//! Driver for 128x32 SSD1306-based OLED displays via I2C. The driver keeps no
//! frame buffer; callers send whole pages (8 pixel rows) of column bytes.

use dfmini_hal::i2c::I2cBus;
use embedded_hal::delay::DelayNs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 32;
pub const PAGES: usize = HEIGHT / 8;

/// Power-up settle time before the init sequence (ms)
const POWER_UP_DELAY_MS: u32 = 100;

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_RANGE: u8 = 0x21;
    pub const SET_PAGE_RANGE: u8 = 0x22;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
}

/// SSD1306 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ssd1306Config {
    /// 7-bit I2C address (0x3C or 0x3D)
    pub address: u8,
    /// Contrast applied during init
    pub contrast: u8,
}

impl Default for Ssd1306Config {
    fn default() -> Self {
        Self {
            address: 0x3C,
            contrast: 0x7F,
        }
    }
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    config: Ssd1306Config,
}

impl<I2C: I2cBus> Ssd1306<I2C> {
    /// Create a new SSD1306 driver
    pub fn new(i2c: I2C, config: Ssd1306Config) -> Self {
        Self { i2c, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Ssd1306Config {
        &self.config
    }

    /// Initialize the display
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), I2C::Error> {
        delay.delay_ms(POWER_UP_DELAY_MS);

        let init_cmds: [u8; 28] = [
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x00,
            cmd::SET_MUX_RATIO,
            0x1F, // 32 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::SET_MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x02, // Sequential COM config for 32 rows
            cmd::DEACTIVATE_SCROLL,
            cmd::SET_COLUMN_RANGE,
            0x00,
            0xFF,
            cmd::SET_PAGE_RANGE,
            0x00,
            0x07,
            cmd::SET_CONTRAST,
            self.config.contrast,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
        ];

        for &c in &init_cmds {
            self.command(c)?;
        }
        self.command(cmd::DISPLAY_ON)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SSD1306 at {=u8:#x} initialized", self.config.address);

        Ok(())
    }

    /// Send a single command byte
    pub fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.config.address, &[CONTROL_COMMAND, cmd])
    }

    /// Move the write position
    ///
    /// `x` counts 8-pixel columns (0..15), `y` counts pages (0..3).
    pub fn set_cursor(&mut self, x: u8, y: u8) -> Result<(), I2C::Error> {
        let column = x.wrapping_mul(8);
        self.command(cmd::SET_LOW_COLUMN | (column & 0x0F))?;
        self.command(cmd::SET_HIGH_COLUMN | ((column >> 4) & 0x0F))?;
        self.command(cmd::SET_PAGE_ADDR | (y & 0x07))
    }

    /// Write column bytes to a page, starting at column 0
    ///
    /// Data beyond the display width is ignored.
    pub fn send_page(&mut self, page: u8, data: &[u8]) -> Result<(), I2C::Error> {
        self.command(cmd::SET_PAGE_ADDR | (page & 0x07))?;
        self.command(cmd::SET_HIGH_COLUMN)?;
        self.command(cmd::SET_LOW_COLUMN)?;

        let len = data.len().min(WIDTH);
        let mut buf = [0u8; WIDTH + 1];
        buf[0] = CONTROL_DATA;
        buf[1..=len].copy_from_slice(&data[..len]);
        self.i2c.write(self.config.address, &buf[..=len])
    }

    /// Blank every page
    pub fn clear(&mut self) -> Result<(), I2C::Error> {
        let blank = [0u8; WIDTH];
        for page in 0..PAGES as u8 {
            self.send_page(page, &blank)?;
        }
        Ok(())
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), I2C::Error> {
        self.command(cmd::SET_CONTRAST)?;
        self.command(contrast)?;
        self.config.contrast = contrast;
        Ok(())
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) -> Result<(), I2C::Error> {
        if on {
            self.command(cmd::DISPLAY_ON)
        } else {
            self.command(cmd::DISPLAY_OFF)
        }
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), I2C::Error> {
        if inverted {
            self.command(cmd::SET_INVERSE)
        } else {
            self.command(cmd::SET_NORMAL)
        }
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockI2c};

    fn display() -> Ssd1306<MockI2c> {
        Ssd1306::new(MockI2c::new(), Ssd1306Config::default())
    }

    #[test]
    fn test_init_sequence() {
        let mut oled = display();
        let mut delay = MockDelay::new();
        oled.init(&mut delay).unwrap();
        assert_eq!(delay.total_ms(), 100);

        let i2c = oled.release();
        assert!(i2c.writes().iter().all(|(addr, data)| *addr == 0x3C && data.len() == 2));
        assert_eq!(
            i2c.commands().as_slice(),
            &[
                0xAE, 0xD5, 0x00, 0xA8, 0x1F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1,
                0xC8, 0xDA, 0x02, 0x2E, 0x21, 0x00, 0xFF, 0x22, 0x00, 0x07, 0x81, 0x7F, 0xDB,
                0x40, 0xA4, 0xAF,
            ]
        );
    }

    #[test]
    fn test_init_uses_configured_contrast() {
        let config = Ssd1306Config {
            address: 0x3D,
            contrast: 0x20,
        };
        let mut oled = Ssd1306::new(MockI2c::new(), config);
        oled.init(&mut MockDelay::new()).unwrap();

        let i2c = oled.release();
        let commands = i2c.commands();
        let pos = commands.iter().position(|&c| c == 0x81).unwrap();
        assert_eq!(commands[pos + 1], 0x20);
        assert_eq!(i2c.writes()[0].0, 0x3D);
    }

    #[test]
    fn test_set_cursor() {
        let mut oled = display();
        oled.set_cursor(3, 2).unwrap();
        // Column 24 = 0x18
        assert_eq!(oled.release().commands().as_slice(), &[0x08, 0x11, 0xB2]);
    }

    #[test]
    fn test_send_page() {
        let mut oled = display();
        oled.send_page(1, &[0xFF, 0x81, 0xFF]).unwrap();

        let i2c = oled.release();
        assert_eq!(i2c.commands().as_slice(), &[0xB1, 0x10, 0x00]);
        let (_, data) = i2c.writes().last().unwrap();
        assert_eq!(data.as_slice(), &[0x40, 0xFF, 0x81, 0xFF]);
    }

    #[test]
    fn test_send_page_truncates_to_width() {
        let mut oled = display();
        oled.send_page(0, &[0xAA; 140]).unwrap();

        let i2c = oled.release();
        let (_, data) = i2c.writes().last().unwrap();
        assert_eq!(data.len(), WIDTH + 1);
    }

    #[test]
    fn test_clear_writes_every_page() {
        let mut oled = display();
        oled.clear().unwrap();

        let i2c = oled.release();
        let pages: heapless::Vec<&[u8], 4> = i2c
            .writes()
            .iter()
            .filter(|(_, data)| data[0] == 0x40)
            .map(|(_, data)| &data[1..])
            .collect();
        assert_eq!(pages.len(), PAGES);
        assert!(pages.iter().all(|p| p.len() == WIDTH && p.iter().all(|&b| b == 0)));
    }

    #[test]
    fn test_contrast_and_modes() {
        let mut oled = display();
        oled.set_contrast(0x10).unwrap();
        oled.set_display_on(false).unwrap();
        oled.set_inverted(true).unwrap();
        oled.set_inverted(false).unwrap();
        assert_eq!(oled.config().contrast, 0x10);
        assert_eq!(
            oled.release().commands().as_slice(),
            &[0x81, 0x10, 0xAE, 0xA7, 0xA6]
        );
    }
}
