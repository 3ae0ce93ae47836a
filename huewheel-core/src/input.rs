//! Encoder input sampling
//!
//! Turns raw per-tick readings into events. A click fires on the rising
//! edge of the button only: holding it down produces one click, and
//! releasing it produces none. Rotation is reported as the raw delta.

use crate::traits::RotaryEncoder;

/// Events seen in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    /// Button went from released to pressed this tick
    pub click: bool,
    /// Encoder steps since the previous tick
    pub delta: i32,
}

impl InputSample {
    /// Whether the encoder moved
    pub fn rotated(&self) -> bool {
        self.delta != 0
    }

    pub fn is_idle(&self) -> bool {
        !self.click && !self.rotated()
    }
}

/// Click edge detector
#[derive(Debug, Clone, Default)]
pub struct InputController {
    prev_pressed: bool,
}

impl InputController {
    /// Start with the button released
    pub const fn new() -> Self {
        Self {
            prev_pressed: false,
        }
    }

    /// Feed one tick of raw readings
    pub fn update(&mut self, pressed: bool, delta: i32) -> InputSample {
        let click = pressed && !self.prev_pressed;
        self.prev_pressed = pressed;
        InputSample { click, delta }
    }

    /// Read the device and feed the result
    ///
    /// On a read error the edge state is left untouched.
    pub fn poll<E: RotaryEncoder>(&mut self, encoder: &mut E) -> Result<InputSample, E::Error> {
        let pressed = encoder.pressed()?;
        let delta = encoder.delta()?;
        Ok(self.update(pressed, delta))
    }
}
