//! Rotary encoder with push button

/// Trait for a rotary encoder with an integrated push button
///
/// Both reads are polled once per tick and must not block.
pub trait RotaryEncoder {
    /// Error type for device reads
    type Error;

    /// Signed step count accumulated since the previous call
    ///
    /// Reading resets the device's accumulator.
    fn delta(&mut self) -> Result<i32, Self::Error>;

    /// Whether the button is held down right now
    fn pressed(&mut self) -> Result<bool, Self::Error>;
}

impl<T: RotaryEncoder + ?Sized> RotaryEncoder for &mut T {
    type Error = T::Error;

    fn delta(&mut self) -> Result<i32, Self::Error> {
        (**self).delta()
    }

    fn pressed(&mut self) -> Result<bool, Self::Error> {
        (**self).pressed()
    }
}
