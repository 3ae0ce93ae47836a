//! Board pin map
//!
//! Wiring for an Adafruit QT Py RP2040 with the encoder breakout on the
//! STEMMA QT connector and the host link on the TX pad.

use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, PIN_20, PIN_22, PIN_23, UART1};
use embassy_rp::uart::{self, Blocking, UartTx};
use embassy_rp::Peri;
use huewheel_hal::i2c::I2cConfig;
use huewheel_hal::uart::UartConfig;

use crate::i2c::{gpio_to_i2c, I2cAdapter, I2cId, I2cSignal};
use crate::uart::{gpio_to_uart, is_tx_pin, SerialSink, UartId};

/// Host link TX pin
pub const UART_TX_PIN: u8 = 20;
/// STEMMA QT data pin
pub const I2C_SDA_PIN: u8 = 22;
/// STEMMA QT clock pin
pub const I2C_SCL_PIN: u8 = 23;

/// UART carrying the wire blocks
pub const HOST_UART: UartId = UartId::Uart1;
/// I2C bus of the STEMMA QT connector
pub const ENCODER_I2C: I2cId = I2cId::I2c1;

/// Check the pin map against the RP2040 pin functions
pub const fn pin_map_is_valid() -> bool {
    matches!(gpio_to_uart(UART_TX_PIN), Some(UartId::Uart1))
        && is_tx_pin(UART_TX_PIN)
        && matches!(gpio_to_i2c(I2C_SDA_PIN), Some((I2cId::I2c1, I2cSignal::Sda)))
        && matches!(gpio_to_i2c(I2C_SCL_PIN), Some((I2cId::I2c1, I2cSignal::Scl)))
}

const _: () = assert!(pin_map_is_valid());

/// Block sink on the host link
pub type HostLink = SerialSink<UartTx<'static, Blocking>>;

/// Bus the encoder breakout hangs off
pub type EncoderBus = I2cAdapter<I2c<'static, I2C1, i2c::Blocking>>;

/// Bring up the TX-only host UART
pub fn host_link(uart: Peri<'static, UART1>, tx: Peri<'static, PIN_20>, config: UartConfig) -> HostLink {
    let mut rp_config = uart::Config::default();
    rp_config.baudrate = config.baudrate;
    SerialSink::new(UartTx::new_blocking(uart, tx, rp_config))
}

/// Bring up the STEMMA QT I2C bus
pub fn encoder_bus(
    i2c: Peri<'static, I2C1>,
    scl: Peri<'static, PIN_23>,
    sda: Peri<'static, PIN_22>,
    config: I2cConfig,
) -> EncoderBus {
    let mut rp_config = i2c::Config::default();
    rp_config.frequency = config.frequency;
    I2cAdapter::new(I2c::new_blocking(i2c, scl, sda, rp_config))
}
