//! Main loop poller
//!
//! Drains the reading mailbox and prints each reading on the console as
//! `SYS=DIA=BPM`. A reading that completes between two polls replaces the
//! one still waiting.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};

use bpmon_core::BpDevice;
use bpmon_hal_rp2040::Console;

/// Poller task - prints new readings
#[embassy_executor::task]
pub async fn poller_task(
    device: &'static BpDevice,
    mut console: Console<BufferedUartTx>,
    interval_ms: u32,
) {
    info!("Poller task started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));

    loop {
        ticker.next().await;

        #[cfg(feature = "raw-debug")]
        if let Err(e) = device.poll_raw(&mut console) {
            warn!("Console write failed: {:?}", e);
        }

        match device.poll(&mut console) {
            Ok(Some(reading)) => {
                info!("Reading: {}", reading);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Console write failed, reading dropped: {:?}", e);
            }
        }
    }
}
