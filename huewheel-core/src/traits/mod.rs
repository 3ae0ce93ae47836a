//! Device traits
//!
//! These traits define the interface between the core logic and the
//! input hardware. The serial sink trait lives in `huewheel-hal`.

pub mod encoder;

pub use encoder::RotaryEncoder;
