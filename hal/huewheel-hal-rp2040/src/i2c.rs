//! I2C master adapter

use huewheel_hal::I2cBus;

/// I2C peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cId {
    I2c0,
    I2c1,
}

/// Signal carried by an I2C-capable pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cSignal {
    Sda,
    Scl,
}

/// Determine which I2C peripheral and signal a GPIO pin carries
///
/// Pins repeat every four GPIOs: SDA0, SCL0, SDA1, SCL1.
pub const fn gpio_to_i2c(gpio: u8) -> Option<(I2cId, I2cSignal)> {
    if gpio > 29 {
        return None;
    }
    let id = if gpio % 4 < 2 { I2cId::I2c0 } else { I2cId::I2c1 };
    let signal = if gpio % 2 == 0 {
        I2cSignal::Sda
    } else {
        I2cSignal::Scl
    };
    Some((id, signal))
}

/// Any `embedded_hal` I2C master used as an [`I2cBus`]
pub struct I2cAdapter<T> {
    inner: T,
}

impl<T: embedded_hal::i2c::I2c> I2cAdapter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: embedded_hal::i2c::I2c> I2cBus for I2cAdapter<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::i2c::I2c::write(&mut self.inner, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        embedded_hal::i2c::I2c::read(&mut self.inner, address, buf)
    }
}
