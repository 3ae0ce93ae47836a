//! Huewheel - Palette Cycling Display Firmware
//!
//! Paints an indexed raster once at boot, then animates it by rotating the
//! color table as the encoder knob turns. Frame and palette stream to the
//! host as wire blocks over UART; a knob click resends the full state.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use huewheel_core::orchestrator::Orchestrator;
use huewheel_core::raster::IndexedRaster;
use huewheel_drivers::encoder::{Seesaw, SeesawConfig};
use huewheel_hal::i2c::I2cConfig;
use huewheel_hal::uart::UartConfig;
use huewheel_hal_rp2040::board;

mod config;
mod tasks;

/// Frame buffer size: 160x128 at up to 8 bits per pixel
const FRAME_BUF_LEN: usize = 160 * 128;

// Painted once, then read-only for the life of the firmware
static FRAME_BUF: StaticCell<[u8; FRAME_BUF_LEN]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Huewheel firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let profile = config::load_profile();

    // Paint the raster
    let geometry = match profile.geometry() {
        Ok(geometry) => geometry,
        Err(e) => defmt::panic!("Bad raster geometry: {}", e),
    };
    let buf = FRAME_BUF.init([0; FRAME_BUF_LEN]);
    let mut raster = match IndexedRaster::new(geometry, profile.colors.len(), buf) {
        Ok(raster) => raster,
        Err(e) => defmt::panic!("Raster does not fit the frame buffer: {}", e),
    };
    if let Err(e) = profile.paint(&mut raster) {
        defmt::panic!("Painter failed: {}", e);
    }
    let raster = raster.freeze();
    info!("display size {} {}", geometry.width(), geometry.height());
    info!("bits per pixel {}", geometry.bits_per_pixel());

    // Host link
    let uart_config = UartConfig::default();
    let sink = board::host_link(p.UART1, p.PIN_20, uart_config);
    info!("Host UART TX on GPIO{} at {} baud", board::UART_TX_PIN, uart_config.baudrate);

    // Encoder on the STEMMA QT connector
    let bus = board::encoder_bus(p.I2C1, p.PIN_23, p.PIN_22, I2cConfig::FAST);
    info!(
        "Encoder I2C on GPIO{}/GPIO{} (SDA/SCL)",
        board::I2C_SDA_PIN,
        board::I2C_SCL_PIN
    );
    let encoder_config = SeesawConfig::default();
    let mut encoder = Seesaw::new(bus, Delay, encoder_config);
    match encoder.init() {
        Ok(version) => info!(
            "Seesaw at {:#04x}: product {}, date code {:#06x}",
            encoder_config.address,
            version >> 16,
            version & 0xffff
        ),
        Err(e) => defmt::panic!("Encoder check failed: {}", e),
    }

    let orchestrator = match Orchestrator::new(
        sink,
        raster,
        unwrap!(profile.palette()),
        unwrap!(profile.scheme()),
        profile.stream,
    ) {
        Ok(orchestrator) => orchestrator,
        Err(e) => defmt::panic!("Inconsistent profile: {}", e),
    };

    let period = Duration::from_millis(u64::from(profile.tick_ms));
    tasks::stream::run(orchestrator, encoder, period).await
}
