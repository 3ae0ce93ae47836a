//! Board-agnostic core logic for the palette cycling firmware
//!
//! This crate contains everything that does not touch real hardware:
//!
//! - Palette storage and color serialization
//! - Rotation of the color table by an encoder-driven offset
//! - The indexed raster and the painters that fill it once at boot
//! - Click-edge detection on the encoder button
//! - The per-tick orchestrator deciding what to stream
//! - Deployment profiles and their TOML-subset parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod input;
pub mod orchestrator;
pub mod palette;
pub mod raster;
pub mod rotation;
pub mod traits;
