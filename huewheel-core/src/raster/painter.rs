//! Raster painters
//!
//! A painter fills the raster exactly once at boot. Everything that moves
//! on screen afterwards comes from palette rotation, so painters lay out
//! indices with the rotating zone in mind.

use super::IndexedRaster;
use crate::config::ConfigError;

/// Fills a raster with palette indices
pub trait Painter {
    /// Paint every pixel of `raster`
    ///
    /// Returns an error if the pattern needs more palette entries than the
    /// raster allows.
    fn paint(&self, raster: &mut IndexedRaster<'_>) -> Result<(), ConfigError>;
}

/// Gray grid with a cycleable red and white checkerboard
///
/// Palette layout expected by this pattern:
/// - 0: background, 1: grid lines
/// - 4..8: four shades of the first checker color
/// - 8..12: four shades of the second checker color
///
/// Inside the checker square each 4-pixel column stripe takes the next
/// shade, so rotating indices 4..12 by one step scrolls the checker
/// sideways and rotating by four swaps the two colors.
#[derive(Debug, Clone, Copy)]
pub struct CheckerPainter {
    /// Top-left corner of the checker square
    pub origin: (u16, u16),
    /// Checker square side length in pixels
    pub size: u16,
    /// Grid and checker cell size in pixels (power of two)
    pub cell: u16,
}

impl Default for CheckerPainter {
    fn default() -> Self {
        Self {
            origin: (48, 32),
            size: 48,
            cell: 16,
        }
    }
}

impl CheckerPainter {
    fn index_at(&self, x: u16, y: u16) -> u8 {
        let (ox, oy) = self.origin;
        let inside = x >= ox && x < ox + self.size && y >= oy && y < oy + self.size;
        let cell_x = x / self.cell;
        let cell_y = y / self.cell;

        if inside {
            let shade = ((x >> 2) & 3) as u8;
            let grid = ((cell_x ^ cell_y) & 1) as u8;
            4 + grid * 4 + shade
        } else if x % self.cell == 0 || y % self.cell == 0 {
            1
        } else {
            0
        }
    }
}

impl Painter for CheckerPainter {
    fn paint(&self, raster: &mut IndexedRaster<'_>) -> Result<(), ConfigError> {
        let geometry = raster.geometry();
        for y in 0..geometry.height() {
            for x in 0..geometry.width() {
                raster.set(x, y, self.index_at(x, y))?;
            }
        }
        Ok(())
    }
}

/// Diagonal bands stepping through every palette index
///
/// Meant for whole-table rotation: each rotation step moves the bands by
/// one band width.
#[derive(Debug, Clone, Copy)]
pub struct BandsPainter {
    /// Band width in pixels, measured along x
    pub width: u16,
}

impl Default for BandsPainter {
    fn default() -> Self {
        Self { width: 8 }
    }
}

impl Painter for BandsPainter {
    fn paint(&self, raster: &mut IndexedRaster<'_>) -> Result<(), ConfigError> {
        let geometry = raster.geometry();
        let colors = raster.colors() as u32;
        let width = u32::from(self.width.max(1));
        for y in 0..geometry.height() {
            for x in 0..geometry.width() {
                let band = (u32::from(x) + u32::from(y)) / width;
                raster.set(x, y, (band % colors) as u8)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterGeometry;

    fn paint_with(painter: &dyn Painter, w: u16, h: u16, colors: usize) -> std::vec::Vec<u8> {
        let geometry = RasterGeometry::for_palette(w, h, colors).unwrap();
        let mut buf = std::vec![0u8; geometry.buffer_len()];
        let mut raster = IndexedRaster::new(geometry, colors, &mut buf).unwrap();
        painter.paint(&mut raster).unwrap();
        let frozen = raster.freeze();
        let mut pixels = std::vec::Vec::new();
        for y in 0..h {
            for x in 0..w {
                pixels.push(frozen.get(x, y).unwrap());
            }
        }
        pixels
    }

    #[test]
    fn test_checker_reference_pixels() {
        let painter = CheckerPainter::default();
        // Grid line, background, and checker cells
        assert_eq!(painter.index_at(0, 5), 1);
        assert_eq!(painter.index_at(5, 16), 1);
        assert_eq!(painter.index_at(5, 5), 0);
        // (48, 32): cells (3, 2) -> grid 1, shade (48 >> 2) & 3 = 0
        assert_eq!(painter.index_at(48, 32), 8);
        // (52, 32): shade 1
        assert_eq!(painter.index_at(52, 32), 9);
        // (64, 32): cells (4, 2) -> grid 0
        assert_eq!(painter.index_at(64, 32), 4);
        // Checker square replaces grid lines
        assert_eq!(painter.index_at(64, 48), 8);
        assert_eq!(painter.index_at(96, 40), 1);
    }

    #[test]
    fn test_checker_uses_twelve_entries() {
        let pixels = paint_with(&CheckerPainter::default(), 160, 128, 16);
        assert!(pixels.iter().all(|&p| p < 12));
        assert!(pixels.contains(&11));
    }

    #[test]
    fn test_checker_needs_twelve_colors() {
        let geometry = RasterGeometry::for_palette(160, 128, 6).unwrap();
        let mut buf = std::vec![0u8; geometry.buffer_len()];
        let mut raster = IndexedRaster::new(geometry, 6, &mut buf).unwrap();
        assert_eq!(
            CheckerPainter::default().paint(&mut raster),
            Err(ConfigError::PixelIndex)
        );
    }

    #[test]
    fn test_bands_cover_palette() {
        let pixels = paint_with(&BandsPainter { width: 2 }, 32, 4, 6);
        for index in 0..6u8 {
            assert!(pixels.contains(&index));
        }
        assert_eq!(&pixels[..6], &[0, 0, 1, 1, 2, 2]);
    }
}
