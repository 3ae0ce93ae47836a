//! Deployment profiles and built-in presets

use core::ops::Range;

use heapless::String;
use huewheel_protocol::MAX_STRIDE;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::palette::{Color, ColorFormat, Colors, PaletteStore, MAX_COLORS};
use crate::raster::{BandsPainter, CheckerPainter, IndexedRaster, Painter, RasterGeometry};
use crate::rotation::RotationScheme;

/// Maximum profile name length
pub const MAX_NAME_LEN: usize = 16;

/// Names accepted by [`DeploymentProfile::preset`]
pub const PRESET_NAMES: [&str; 3] = ["checker16", "bands32", "bands6"];

/// What a click re-sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClickPolicy {
    /// Frame only; the receiver keeps its last palette
    FrameOnly,
    /// Frame, then the current palette
    #[default]
    FrameAndPalette,
}

/// What a rotation re-sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotatePolicy {
    /// Rotated palette only
    #[default]
    PaletteOnly,
    /// Rotated palette, then the frame
    PaletteAndFrame,
}

/// How blocks are cut and when they are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamSettings {
    /// Raw bytes per FRAME chunk line
    pub frame_stride: usize,
    /// Raw bytes per PALETTE chunk line
    pub palette_stride: usize,
    /// Palette entry layout on the wire
    pub color_format: ColorFormat,
    /// Blank line before each `BEGIN` marker
    pub separator: bool,
    pub click: ClickPolicy,
    pub rotate: RotatePolicy,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            frame_stride: 60,
            palette_stride: 60,
            color_format: ColorFormat::Rgb888,
            separator: true,
            click: ClickPolicy::FrameAndPalette,
            rotate: RotatePolicy::PaletteOnly,
        }
    }
}

impl StreamSettings {
    /// Check both strides fit the encoder's line buffer
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |stride: usize| stride > 0 && stride <= MAX_STRIDE;
        if !valid(self.frame_stride) || !valid(self.palette_stride) {
            return Err(ConfigError::Stride);
        }
        Ok(())
    }
}

/// Pattern painted into the raster at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PainterKind {
    /// Gray grid with a red and white checkerboard
    #[default]
    Checker,
    /// Diagonal bands over the whole palette
    Bands,
}

impl PainterKind {
    /// Smallest palette the pattern can be painted with
    pub fn min_colors(&self) -> usize {
        match self {
            PainterKind::Checker => 12,
            PainterKind::Bands => 1,
        }
    }
}

/// Every per-deployment constant
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeploymentProfile {
    pub name: String<MAX_NAME_LEN>,
    /// Raster width in pixels
    pub width: u16,
    /// Raster height in pixels
    pub height: u16,
    /// Palette in boot order
    pub colors: Colors,
    /// First palette index of the rotating zone
    pub zone_start: usize,
    /// One past the last palette index of the rotating zone
    pub zone_end: usize,
    /// Number of distinct rotation offsets (K)
    pub modulus: usize,
    pub stream: StreamSettings,
    /// Input polling period
    pub tick_ms: u32,
    pub painter: PainterKind,
    /// Band width for [`PainterKind::Bands`]
    pub band_width: u16,
}

impl Default for DeploymentProfile {
    fn default() -> Self {
        Self::checker16()
    }
}

impl DeploymentProfile {
    /// Look up a built-in preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "checker16" => Some(Self::checker16()),
            "bands32" => Some(Self::bands32()),
            "bands6" => Some(Self::bands6()),
            _ => None,
        }
    }

    /// 160x128 gray grid with a red/white checker cycling through 8 steps
    pub fn checker16() -> Self {
        const PALETTE: [u32; 16] = [
            0xaaaaaa, // gray
            0x666666, // dark gray
            0xaa00aa, // purple
            0x660066, // dark purple
            0xffffff, // white
            0xf7f7f7,
            0xefefef,
            0xe7e7e7,
            0xff0000, // red
            0xf70000,
            0xef0000,
            0xe70000,
            0xff00ff, // magenta, unused
            0xff00ff,
            0xff00ff,
            0xff00ff,
        ];

        Self {
            name: name("checker16"),
            width: 160,
            height: 128,
            colors: PALETTE.iter().map(|&hex| Color::rgb(hex)).collect(),
            zone_start: 4,
            zone_end: 12,
            modulus: 8,
            stream: StreamSettings::default(),
            tick_ms: 5,
            painter: PainterKind::Checker,
            band_width: 8,
        }
    }

    /// 32-color hue wheel, whole table rotates, frame re-sent on rotation
    pub fn bands32() -> Self {
        Self {
            name: name("bands32"),
            width: 160,
            height: 128,
            colors: hue_wheel(32),
            zone_start: 0,
            zone_end: 32,
            modulus: 32,
            stream: StreamSettings {
                frame_stride: 96,
                palette_stride: 96,
                rotate: RotatePolicy::PaletteAndFrame,
                ..StreamSettings::default()
            },
            tick_ms: 5,
            painter: PainterKind::Bands,
            band_width: 5,
        }
    }

    /// Six primary and secondary hues, whole table rotates
    pub fn bands6() -> Self {
        Self {
            name: name("bands6"),
            width: 160,
            height: 128,
            colors: hue_wheel(6),
            zone_start: 0,
            zone_end: 6,
            modulus: 6,
            stream: StreamSettings {
                frame_stride: 96,
                ..StreamSettings::default()
            },
            tick_ms: 5,
            painter: PainterKind::Bands,
            band_width: 16,
        }
    }

    /// Check every constant before anything is built from them
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() || self.colors.len() > MAX_COLORS {
            return Err(ConfigError::PaletteSize);
        }
        self.scheme()?;
        self.stream.validate()?;
        self.geometry()?;
        if self.tick_ms == 0 {
            return Err(ConfigError::TickPeriod);
        }
        if self.colors.len() < self.painter.min_colors() {
            return Err(ConfigError::PixelIndex);
        }
        Ok(())
    }

    pub fn zone(&self) -> Range<usize> {
        self.zone_start..self.zone_end
    }

    pub fn scheme(&self) -> Result<RotationScheme, ConfigError> {
        RotationScheme::new(self.colors.len(), self.zone(), self.modulus)
    }

    pub fn palette(&self) -> Result<PaletteStore, ConfigError> {
        PaletteStore::new(&self.colors)
    }

    pub fn geometry(&self) -> Result<RasterGeometry, ConfigError> {
        RasterGeometry::for_palette(self.width, self.height, self.colors.len())
    }

    /// Fill `raster` with this profile's pattern
    pub fn paint(&self, raster: &mut IndexedRaster<'_>) -> Result<(), ConfigError> {
        match self.painter {
            PainterKind::Checker => CheckerPainter::default().paint(raster),
            PainterKind::Bands => BandsPainter {
                width: self.band_width,
            }
            .paint(raster),
        }
    }
}

fn name(s: &str) -> String<MAX_NAME_LEN> {
    let mut name = String::new();
    for c in s.chars() {
        if name.push(c).is_err() {
            break;
        }
    }
    name
}

/// `n` fully saturated hues, evenly spaced starting at red
fn hue_wheel(n: usize) -> Colors {
    (0..n)
        .map(|i| {
            let hue = (i * 1536 / n) as u32;
            let f = hue % 256;
            let (r, g, b) = match hue / 256 {
                0 => (255, f, 0),
                1 => (255 - f, 255, 0),
                2 => (0, 255, f),
                3 => (0, 255 - f, 255),
                4 => (f, 0, 255),
                _ => (255, 0, 255 - f),
            };
            Color::rgb(r << 16 | g << 8 | b)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for name in PRESET_NAMES {
            let profile = DeploymentProfile::preset(name).unwrap();
            assert_eq!(profile.name.as_str(), name);
            assert_eq!(profile.validate(), Ok(()));
        }
        assert!(DeploymentProfile::preset("nope").is_none());
    }

    #[test]
    fn test_checker16_matches_reference() {
        let profile = DeploymentProfile::checker16();
        assert_eq!(profile.colors.len(), 16);
        assert_eq!(profile.colors[4], Color::rgb(0xffffff));
        assert_eq!(profile.colors[8], Color::rgb(0xff0000));
        assert_eq!(profile.zone(), 4..12);
        assert_eq!(profile.modulus, 8);
        assert_eq!(profile.stream.frame_stride, 60);
        assert_eq!(profile.stream.rotate, RotatePolicy::PaletteOnly);
        assert_eq!(profile.geometry().unwrap().bits_per_pixel(), 4);
    }

    #[test]
    fn test_hue_wheel_six() {
        let hex: std::vec::Vec<u32> = hue_wheel(6).iter().map(|c| c.to_rgb()).collect();
        assert_eq!(hex, [0xff0000, 0xffff00, 0x00ff00, 0x00ffff, 0x0000ff, 0xff00ff]);
    }

    #[test]
    fn test_validate_rejects() {
        let mut profile = DeploymentProfile::checker16();
        profile.modulus = 9;
        assert_eq!(profile.validate(), Err(ConfigError::Modulus));

        let mut profile = DeploymentProfile::checker16();
        profile.stream.palette_stride = MAX_STRIDE + 1;
        assert_eq!(profile.validate(), Err(ConfigError::Stride));

        let mut profile = DeploymentProfile::checker16();
        profile.tick_ms = 0;
        assert_eq!(profile.validate(), Err(ConfigError::TickPeriod));

        let mut profile = DeploymentProfile::checker16();
        profile.height = 0;
        assert_eq!(profile.validate(), Err(ConfigError::RasterSize));

        let mut profile = DeploymentProfile::bands6();
        profile.painter = PainterKind::Checker;
        assert_eq!(profile.validate(), Err(ConfigError::PixelIndex));
    }

    #[test]
    fn test_paint_dispatch() {
        let profile = DeploymentProfile::bands6();
        let geometry = profile.geometry().unwrap();
        let mut buf = std::vec![0u8; geometry.buffer_len()];
        let mut raster = IndexedRaster::new(geometry, 6, &mut buf).unwrap();
        profile.paint(&mut raster).unwrap();
        // 16 px bands: (16, 0) is the second band
        assert_eq!(raster.get(15, 0), Some(0));
        assert_eq!(raster.get(16, 0), Some(1));
    }
}
