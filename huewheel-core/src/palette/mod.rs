//! Color palette
//!
//! The palette is the only part of the image that changes after boot.
//! Colors are opaque to the store; byte layout is decided at
//! serialization time by [`ColorFormat`].

pub mod color;
pub mod store;

pub use color::{Color, ColorFormat};
pub use store::{PaletteBytes, PaletteStore, Colors, MAX_COLORS};
