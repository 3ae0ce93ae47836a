//! RP2040-specific HAL for the palette streamer
//!
//! This crate adapts embassy-rp peripherals to the `huewheel-hal` traits:
//! - UART transmitter as the block sink
//! - I2C master for the encoder breakout
//! - Board pin map, pin checks and peripheral bring-up

#![no_std]

pub mod board;
pub mod i2c;
pub mod uart;

pub use i2c::I2cAdapter;
pub use uart::SerialSink;
