//! UART sink
//!
//! RP2040 has two UART peripherals (UART0 and UART1), each usable on a
//! fixed set of pins.

use huewheel_hal::UartTx;

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Determine which UART can use a given GPIO pin
pub const fn gpio_to_uart(gpio: u8) -> Option<UartId> {
    // UART0: GPIO 0/1, 12/13, 16/17, 28/29
    // UART1: GPIO 4/5, 8/9, 20/21, 24/25
    match gpio {
        0 | 1 | 12 | 13 | 16 | 17 | 28 | 29 => Some(UartId::Uart0),
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Whether `gpio` is a TX pin (as opposed to RX) for its UART
pub const fn is_tx_pin(gpio: u8) -> bool {
    gpio_to_uart(gpio).is_some() && gpio % 4 == 0
}

/// Any blocking `embedded_io` writer used as the block sink
///
/// Wraps the embassy-rp UART transmitter in blocking mode. Blocks are
/// written line by line, so no DMA buffer is needed.
pub struct SerialSink<W> {
    inner: W,
}

impl<W: embedded_io::Write> SerialSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: embedded_io::Write> UartTx for SerialSink<W> {
    type Error = W::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}
