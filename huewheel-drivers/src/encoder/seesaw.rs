//! Adafruit Seesaw I2C rotary encoder
//!
//! The Seesaw is a small co-processor that exposes GPIO and quadrature
//! encoder counters over I2C. The rotary encoder breakout (product 4991)
//! wires the knob to encoder 0 and its push button to GPIO 24.
//!
//! # Register access
//!
//! Registers are addressed by a (module base, function) pair:
//! - Write: `[base, function, data...]`
//! - Read: write `[base, function]`, wait for the chip to fetch the
//!   value, then read
//!
//! All multi-byte values are big-endian.

use embedded_hal::delay::DelayNs;
use huewheel_core::traits::RotaryEncoder;
use huewheel_hal::I2cBus;

/// Seesaw register addresses
pub mod reg {
    /// Status module
    pub const STATUS_BASE: u8 = 0x00;
    /// Product id (high 16 bits) and date code
    pub const STATUS_VERSION: u8 = 0x02;

    /// GPIO module
    pub const GPIO_BASE: u8 = 0x01;
    /// Make masked pins inputs
    pub const GPIO_DIRCLR_BULK: u8 = 0x03;
    /// Pin levels
    pub const GPIO_BULK: u8 = 0x04;
    /// Drive masked pins high (selects pull-up when pull is enabled)
    pub const GPIO_BULK_SET: u8 = 0x05;
    /// Enable pull resistors on masked pins
    pub const GPIO_PULLENSET: u8 = 0x0B;

    /// Encoder module
    pub const ENCODER_BASE: u8 = 0x11;
    /// Steps since last read, per encoder (offset by encoder number)
    pub const ENCODER_DELTA: u8 = 0x40;
}

/// Default address with no address jumpers soldered
pub const DEFAULT_ADDRESS: u8 = 0x36;

/// Product id of the rotary encoder breakout
pub const ENCODER_PRODUCT_ID: u16 = 4991;

/// Seesaw driver configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeesawConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// GPIO the knob button is wired to
    pub button_pin: u8,
    /// Encoder number on the chip
    pub encoder: u8,
    /// Wait between register select and read
    pub read_delay_us: u32,
}

impl Default for SeesawConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            button_pin: 24,
            encoder: 0,
            read_delay_us: 250,
        }
    }
}

/// Seesaw errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeesawError<E> {
    /// I2C transfer failed
    Bus(E),
    /// Chip reports a different product id
    WrongProduct(u16),
}

/// Seesaw rotary encoder with push button
pub struct Seesaw<I2C, D> {
    i2c: I2C,
    delay: D,
    config: SeesawConfig,
}

impl<I2C: I2cBus, D: DelayNs> Seesaw<I2C, D> {
    pub fn new(i2c: I2C, delay: D, config: SeesawConfig) -> Self {
        Self { i2c, delay, config }
    }

    /// Check the product id and set the button up as a pulled-up input
    ///
    /// Returns the raw version word on success.
    pub fn init(&mut self) -> Result<u32, SeesawError<I2C::Error>> {
        let version = self.check_version()?;
        let mask = self.button_mask().to_be_bytes();
        self.write_reg(reg::GPIO_BASE, reg::GPIO_DIRCLR_BULK, &mask)?;
        self.write_reg(reg::GPIO_BASE, reg::GPIO_PULLENSET, &mask)?;
        self.write_reg(reg::GPIO_BASE, reg::GPIO_BULK_SET, &mask)?;
        Ok(version)
    }

    /// Read the version word and require the encoder breakout's product id
    pub fn check_version(&mut self) -> Result<u32, SeesawError<I2C::Error>> {
        let version = self.version()?;
        let product = (version >> 16) as u16;
        if product != ENCODER_PRODUCT_ID {
            return Err(SeesawError::WrongProduct(product));
        }
        Ok(version)
    }

    /// Raw version word: product id in the high half
    pub fn version(&mut self) -> Result<u32, SeesawError<I2C::Error>> {
        self.read_u32(reg::STATUS_BASE, reg::STATUS_VERSION)
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn button_mask(&self) -> u32 {
        1 << self.config.button_pin
    }

    fn write_reg(&mut self, base: u8, function: u8, data: &[u8; 4]) -> Result<(), SeesawError<I2C::Error>> {
        let frame = [base, function, data[0], data[1], data[2], data[3]];
        self.i2c
            .write(self.config.address, &frame)
            .map_err(SeesawError::Bus)
    }

    fn read_u32(&mut self, base: u8, function: u8) -> Result<u32, SeesawError<I2C::Error>> {
        self.i2c
            .write(self.config.address, &[base, function])
            .map_err(SeesawError::Bus)?;
        self.delay.delay_us(self.config.read_delay_us);
        let mut buf = [0u8; 4];
        self.i2c
            .read(self.config.address, &mut buf)
            .map_err(SeesawError::Bus)?;
        Ok(u32::from_be_bytes(buf))
    }
}

impl<I2C: I2cBus, D: DelayNs> RotaryEncoder for Seesaw<I2C, D> {
    type Error = SeesawError<I2C::Error>;

    fn delta(&mut self) -> Result<i32, Self::Error> {
        let function = reg::ENCODER_DELTA + self.config.encoder;
        self.read_u32(reg::ENCODER_BASE, function).map(|raw| raw as i32)
    }

    /// The button shorts the pin to ground: low means pressed
    fn pressed(&mut self) -> Result<bool, Self::Error> {
        let levels = self.read_u32(reg::GPIO_BASE, reg::GPIO_BULK)?;
        Ok((levels & self.button_mask()) == 0)
    }
}
