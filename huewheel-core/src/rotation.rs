//! Palette rotation
//!
//! A contiguous *zone* of the palette cycles; entries outside the zone are
//! anchors and never move. The rotation offset lives in `[0, K)` where K is
//! the scheme's modulus, and the displayed ordering is the zone rotated
//! left by the offset:
//!
//! ```text
//! base:    [ a0 a1 a2 a3 | z0 z1 z2 z3 z4 z5 z6 z7 | b0 b1 b2 b3 ]
//! offset 3 [ a0 a1 a2 a3 | z3 z4 z5 z6 z7 z0 z1 z2 | b0 b1 b2 b3 ]
//! ```
//!
//! Rotation is computed from the base palette and the absolute offset, so
//! the result never depends on how many steps it took to get there.

use core::ops::Range;

use heapless::Vec;

use crate::config::ConfigError;
use crate::palette::{Color, Colors, MAX_COLORS};

/// Palette index ordering for one offset
pub type Order = Vec<u8, MAX_COLORS>;

/// Result of applying an encoder delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// New offset in `[0, K)`
    pub offset: usize,
    /// Base palette reordered for `offset`
    pub palette: Colors,
}

/// Which palette entries cycle, and with what period
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotationScheme {
    palette_len: usize,
    zone_start: usize,
    zone_end: usize,
    modulus: usize,
}

impl RotationScheme {
    /// Rotate `zone` of a `palette_len` palette with period `modulus`
    pub fn new(palette_len: usize, zone: Range<usize>, modulus: usize) -> Result<Self, ConfigError> {
        if palette_len == 0 || palette_len > MAX_COLORS {
            return Err(ConfigError::PaletteSize);
        }
        if zone.start >= zone.end {
            return Err(ConfigError::EmptyZone);
        }
        if zone.end > palette_len {
            return Err(ConfigError::ZoneOutOfRange);
        }
        if modulus == 0 || modulus > zone.end - zone.start {
            return Err(ConfigError::Modulus);
        }

        Ok(Self {
            palette_len,
            zone_start: zone.start,
            zone_end: zone.end,
            modulus,
        })
    }

    /// Cycle the entire table
    pub fn whole_table(palette_len: usize) -> Result<Self, ConfigError> {
        Self::new(palette_len, 0..palette_len, palette_len)
    }

    pub fn palette_len(&self) -> usize {
        self.palette_len
    }

    pub fn zone(&self) -> Range<usize> {
        self.zone_start..self.zone_end
    }

    /// K: number of distinct offsets
    pub fn modulus(&self) -> usize {
        self.modulus
    }

    /// Offset after turning `delta` steps from `offset`
    ///
    /// # Panics
    ///
    /// If `offset` is outside `[0, K)`. Offsets only come from this
    /// function, so a bad one means the caller's state is corrupt.
    pub fn next_offset(&self, offset: usize, delta: i32) -> usize {
        assert!(offset < self.modulus, "rotation offset out of range");
        let k = self.modulus as i64;
        let next = (offset as i64 + i64::from(delta)).rem_euclid(k) as usize;
        assert!(next < self.modulus, "rotation offset out of range");
        next
    }

    /// Index ordering for `offset`: entry `i` of the view shows base entry `order[i]`
    pub fn order(&self, offset: usize) -> Order {
        assert!(offset < self.modulus, "rotation offset out of range");
        let len = self.zone_end - self.zone_start;
        (0..self.palette_len)
            .map(|i| {
                if self.zone().contains(&i) {
                    self.zone_start + (i - self.zone_start + offset) % len
                } else {
                    i
                }
            })
            .map(|i| i as u8)
            .collect()
    }

    /// Base palette reordered for `offset`
    ///
    /// # Panics
    ///
    /// If `base` does not have the scheme's palette length.
    pub fn reorder(&self, base: &[Color], offset: usize) -> Colors {
        assert_eq!(base.len(), self.palette_len, "palette length mismatch");
        self.order(offset)
            .iter()
            .map(|&i| base[usize::from(i)])
            .collect()
    }

    /// Apply an encoder delta: new offset and the matching ordering
    pub fn rotate(&self, base: &[Color], offset: usize, delta: i32) -> Rotation {
        let offset = self.next_offset(offset, delta);
        Rotation {
            offset,
            palette: self.reorder(base, offset),
        }
    }
}
