//! Hardware driver implementations
//!
//! Concrete implementations of the device traits defined in
//! huewheel-core:
//!
//! - Rotary encoders (Adafruit Seesaw I2C breakout)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod encoder;
