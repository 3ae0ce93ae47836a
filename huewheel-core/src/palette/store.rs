//! Palette storage
//!
//! Holds the palette as created at boot (`base`) and the ordering currently
//! on display (`current`). The length is fixed at construction; the current
//! ordering is only ever replaced as a whole.

use heapless::Vec;

use super::color::{Color, ColorFormat};
use crate::config::ConfigError;

/// Largest supported palette
pub const MAX_COLORS: usize = 32;

/// Palette entries in display order
pub type Colors = Vec<Color, MAX_COLORS>;

/// Serialized palette, big enough for [`MAX_COLORS`] RGBA entries
pub type PaletteBytes = Vec<u8, { MAX_COLORS * 4 }>;

/// Palette state owned by the orchestrator
#[derive(Debug, Clone)]
pub struct PaletteStore {
    base: Colors,
    current: Colors,
}

impl PaletteStore {
    /// Create a store from the boot palette
    pub fn new(colors: &[Color]) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::PaletteSize);
        }
        let base = Colors::from_slice(colors).map_err(|_| ConfigError::PaletteSize)?;

        Ok(Self {
            current: base.clone(),
            base,
        })
    }

    /// Number of colors (never changes)
    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Colors in current display order
    pub fn get(&self) -> &[Color] {
        &self.current
    }

    /// Colors in boot order
    pub fn base(&self) -> &[Color] {
        &self.base
    }

    /// Replace the display ordering
    ///
    /// # Panics
    ///
    /// If `ordering` has a different length than the palette.
    pub fn replace(&mut self, ordering: Colors) {
        assert_eq!(ordering.len(), self.base.len(), "palette length is fixed");
        self.current = ordering;
    }

    /// Serialize the current ordering for the wire
    pub fn to_bytes(&self, format: ColorFormat) -> PaletteBytes {
        let width = format.bytes_per_color();
        let mut bytes = PaletteBytes::new();
        for &color in &self.current {
            let mut entry = [0u8; 4];
            format.write(color, &mut entry);
            // MAX_COLORS * 4 always fits
            let _ = bytes.extend_from_slice(&entry[..width]);
        }
        bytes
    }
}
