//! Firmware loops

pub mod stream;
