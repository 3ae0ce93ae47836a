//! Rotary encoder drivers

pub mod seesaw;

pub use seesaw::{Seesaw, SeesawConfig, SeesawError};
