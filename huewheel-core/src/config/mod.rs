//! Deployment configuration
//!
//! A [`DeploymentProfile`] carries every per-board constant: raster size,
//! palette, rotating zone, chunk strides and send policies. Profiles start
//! from a built-in preset and can be overridden by a `profile.toml`.

pub mod parse;
pub mod profile;

pub use parse::{parse_profile, ParseError, ParseErrorKind};
pub use profile::{
    ClickPolicy, DeploymentProfile, PainterKind, RotatePolicy, StreamSettings, MAX_NAME_LEN,
};

/// Startup configuration faults
///
/// None of these are recoverable: the firmware refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Palette empty or larger than the supported maximum
    PaletteSize,
    /// Rotating zone has no entries
    EmptyZone,
    /// Rotating zone extends past the palette
    ZoneOutOfRange,
    /// Rotation modulus is zero or larger than the zone
    Modulus,
    /// Rotation scheme built for a different palette size
    PaletteMismatch,
    /// Chunk stride is zero or too large for the line buffer
    Stride,
    /// Raster width or height is zero
    RasterSize,
    /// Raster bit depth cannot address every palette index
    BitDepth,
    /// Backing buffer too small for the raster
    RasterBuffer,
    /// Painter wrote an index outside the palette
    PixelIndex,
    /// Painter wrote outside the raster
    PixelBounds,
    /// Tick period is zero
    TickPeriod,
}
