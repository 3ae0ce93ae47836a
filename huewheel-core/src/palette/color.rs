//! Fixed-width color values

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color from `0xRRGGBB`
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
            a: 0xff,
        }
    }

    /// Color from `0xRRGGBBAA`
    pub const fn rgba(hex: u32) -> Self {
        Self {
            r: (hex >> 24) as u8,
            g: (hex >> 16) as u8,
            b: (hex >> 8) as u8,
            a: hex as u8,
        }
    }

    /// `0xRRGGBB`, alpha dropped
    pub const fn to_rgb(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Wire layout of one palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorFormat {
    /// R, G, B
    #[default]
    Rgb888,
    /// R, G, B, A
    Rgba8888,
}

impl ColorFormat {
    pub const fn bytes_per_color(self) -> usize {
        match self {
            ColorFormat::Rgb888 => 3,
            ColorFormat::Rgba8888 => 4,
        }
    }

    /// Write `color` big-endian into `out`
    ///
    /// `out` must hold at least [`bytes_per_color`](Self::bytes_per_color) bytes.
    pub fn write(self, color: Color, out: &mut [u8]) {
        out[0] = color.r;
        out[1] = color.g;
        out[2] = color.b;
        if self == ColorFormat::Rgba8888 {
            out[3] = color.a;
        }
    }
}
