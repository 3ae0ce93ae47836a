//! Fixed-period input polling and block streaming
//!
//! Runs forever on the main executor. Each tick polls the encoder once
//! and lets the orchestrator decide what to send; the ticker only bounds
//! the polling rate.

use defmt::*;
use embassy_time::{Duration, Ticker};
use huewheel_core::orchestrator::{LoopError, Orchestrator};
use huewheel_core::traits::RotaryEncoder;
use huewheel_hal::UartTx;

/// Send the initial state, then poll and stream until power-off
pub async fn run<S, E>(mut orchestrator: Orchestrator<'_, S>, mut encoder: E, period: Duration) -> !
where
    S: UartTx,
    S::Error: Format,
    E: RotaryEncoder,
    E::Error: Format,
{
    match orchestrator.start() {
        Ok(sent) => info!("Initial frame and palette sent ({} blocks)", sent.len()),
        Err(e) => warn!("Initial send failed: {}", e),
    }

    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;

        match orchestrator.tick(&mut encoder) {
            Ok(report) if report.is_idle() => {}
            Ok(report) => {
                if report.sample.click {
                    debug!("Click: full state resent");
                }
                if report.sample.rotated() {
                    debug!("Rotate {} -> offset {}", report.sample.delta, report.offset);
                }
                for tag in report.sent.iter() {
                    trace!("Sent {}", tag);
                }
            }
            Err(LoopError::Input(e)) => warn!("Encoder read failed: {}", e),
            Err(LoopError::Transport(e)) => warn!("Serial write failed: {}", e),
        }
    }
}
