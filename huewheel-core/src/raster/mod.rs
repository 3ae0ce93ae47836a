//! Indexed raster
//!
//! Each pixel is an index into the palette, packed MSB-first at the
//! smallest bit depth (1, 2, 4 or 8) that addresses every palette entry.
//! Rows are padded to 32-bit words. The packed bytes are sent as-is in the
//! FRAME block, so this layout is part of the wire format.
//!
//! The raster is painted once through [`IndexedRaster`] and then frozen
//! into a [`FrozenRaster`], which has no mutating methods.

pub mod painter;

pub use painter::{BandsPainter, CheckerPainter, Painter};

use crate::config::ConfigError;
use crate::palette::MAX_COLORS;

/// Bits per pixel needed to address `colors` palette entries
pub fn bits_for(colors: usize) -> u8 {
    match colors {
        0..=2 => 1,
        3..=4 => 2,
        5..=16 => 4,
        _ => 8,
    }
}

/// Raster dimensions and packing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RasterGeometry {
    width: u16,
    height: u16,
    bits_per_pixel: u8,
}

impl RasterGeometry {
    /// Geometry for a `width` x `height` raster over `colors` palette entries
    pub fn for_palette(width: u16, height: u16, colors: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::RasterSize);
        }
        if colors == 0 || colors > MAX_COLORS {
            return Err(ConfigError::PaletteSize);
        }

        Ok(Self {
            width,
            height,
            bits_per_pixel: bits_for(colors),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    /// Largest palette this geometry can address
    pub fn max_colors(&self) -> usize {
        1 << self.bits_per_pixel
    }

    /// Bytes per row, padded to a 32-bit word
    pub fn row_stride(&self) -> usize {
        let bits = usize::from(self.width) * usize::from(self.bits_per_pixel);
        bits.div_ceil(32) * 4
    }

    /// Size of the packed raster in bytes
    pub fn buffer_len(&self) -> usize {
        self.row_stride() * usize::from(self.height)
    }

    /// Byte index and left shift of pixel (x, y)
    fn locate(&self, x: u16, y: u16) -> (usize, u32) {
        let bpp = usize::from(self.bits_per_pixel);
        let bit = usize::from(x) * bpp;
        let index = usize::from(y) * self.row_stride() + bit / 8;
        let shift = (8 - bpp - bit % 8) as u32;
        (index, shift)
    }

    fn mask(&self) -> u8 {
        ((1u16 << self.bits_per_pixel) - 1) as u8
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }
}

/// Raster under construction
#[derive(Debug)]
pub struct IndexedRaster<'a> {
    geometry: RasterGeometry,
    colors: u8,
    pixels: &'a mut [u8],
}

impl<'a> IndexedRaster<'a> {
    /// Wrap `buf` as a cleared raster for a `colors`-entry palette
    pub fn new(
        geometry: RasterGeometry,
        colors: usize,
        buf: &'a mut [u8],
    ) -> Result<Self, ConfigError> {
        if colors == 0 || colors > MAX_COLORS {
            return Err(ConfigError::PaletteSize);
        }
        if colors > geometry.max_colors() {
            return Err(ConfigError::BitDepth);
        }
        let len = geometry.buffer_len();
        if buf.len() < len {
            return Err(ConfigError::RasterBuffer);
        }

        let pixels = &mut buf[..len];
        pixels.fill(0);

        Ok(Self {
            geometry,
            colors: colors as u8,
            pixels,
        })
    }

    pub fn geometry(&self) -> RasterGeometry {
        self.geometry
    }

    /// Number of palette entries pixels may reference
    pub fn colors(&self) -> usize {
        usize::from(self.colors)
    }

    /// Set pixel (x, y) to palette `index`
    pub fn set(&mut self, x: u16, y: u16, index: u8) -> Result<(), ConfigError> {
        if !self.geometry.contains(x, y) {
            return Err(ConfigError::PixelBounds);
        }
        if index >= self.colors {
            return Err(ConfigError::PixelIndex);
        }

        let (byte, shift) = self.geometry.locate(x, y);
        let mask = self.geometry.mask() << shift;
        self.pixels[byte] = (self.pixels[byte] & !mask) | (index << shift);
        Ok(())
    }

    pub fn get(&self, x: u16, y: u16) -> Option<u8> {
        read_pixel(&self.geometry, self.pixels, x, y)
    }

    /// Finish painting; the result can no longer be modified
    pub fn freeze(self) -> FrozenRaster<'a> {
        FrozenRaster {
            geometry: self.geometry,
            colors: self.colors,
            pixels: self.pixels,
        }
    }
}

/// Painted raster, read-only for the rest of the session
#[derive(Debug, Clone, Copy)]
pub struct FrozenRaster<'a> {
    geometry: RasterGeometry,
    colors: u8,
    pixels: &'a [u8],
}

impl<'a> FrozenRaster<'a> {
    pub fn geometry(&self) -> RasterGeometry {
        self.geometry
    }

    /// Palette size the raster was painted for
    pub fn colors(&self) -> usize {
        usize::from(self.colors)
    }

    /// Packed pixel bytes, exactly as sent in a FRAME block
    pub fn as_bytes(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn get(&self, x: u16, y: u16) -> Option<u8> {
        read_pixel(&self.geometry, self.pixels, x, y)
    }
}

fn read_pixel(geometry: &RasterGeometry, pixels: &[u8], x: u16, y: u16) -> Option<u8> {
    if !geometry.contains(x, y) {
        return None;
    }
    let (byte, shift) = geometry.locate(x, y);
    Some((pixels[byte] >> shift) & geometry.mask())
}
