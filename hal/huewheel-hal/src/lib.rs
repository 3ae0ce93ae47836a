//! Huewheel Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the palette
//! streamer needs. Chip-specific crates implement them so the core logic
//! runs unchanged on the board and on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (huewheel-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  huewheel-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ huewheel-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`] - Write-only serial sink for wire blocks
//! - [`i2c::I2cBus`] - I2C bus operations for the encoder breakout

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use i2c::I2cBus;
pub use uart::UartTx;
