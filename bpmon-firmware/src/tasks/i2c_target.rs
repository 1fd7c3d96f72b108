//! I2C target task
//!
//! Serves controller transactions forever. Handler errors are logged and
//! the task keeps listening.

use defmt::*;
use embassy_time::{Duration, Timer};

use bpmon_hal_rp2040::{RpTarget, TargetError, Transaction};

/// Back-off after a bus error before listening again
const ERROR_BACKOFF_MS: u64 = 10;

/// I2C target task - dispatches bus transactions to the device handlers
#[embassy_executor::task]
pub async fn i2c_target_task(mut target: RpTarget<'static, 'static>) {
    info!("I2C target task started");

    loop {
        match target.serve().await {
            Ok(Transaction::Received(n)) => {
                trace!("RX: {} bytes", n);
            }
            Ok(Transaction::Truncated(n)) => {
                warn!("Controller write overflowed receive buffer, kept {} bytes", n);
            }
            Ok(Transaction::Responded(n)) => {
                trace!("TX: {} bytes", n);
            }
            Ok(Transaction::GeneralCall(n)) => {
                debug!("Ignoring general call ({} bytes)", n);
            }
            Err(e @ (TargetError::NotStarted | TargetError::NoHandler)) => {
                // Setup bug, nothing more will be served
                error!("I2C target not ready: {:?}", e);
                return;
            }
            Err(e) => {
                warn!("I2C target error: {:?}", e);
                Timer::after(Duration::from_millis(ERROR_BACKOFF_MS)).await;
            }
        }
    }
}
