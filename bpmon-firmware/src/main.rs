//! bpmon - Blood Pressure Monitor I2C Target Firmware
//!
//! Main firmware binary for RP2040-based boards. The board sits on the
//! sensor controller's I2C bus as a target at 0x50, frames the sensor
//! packets it is sent, and prints each reading on UART0 for the host
//! application.
//!
//! Pinout:
//! - I2C0: SDA GPIO4, SCL GPIO5
//! - UART0 TX: GPIO0 (9600 8N1)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use bpmon_core::{BpDevice, DeviceConfig};
use bpmon_hal_rp2040::{Console, RpTarget};

mod tasks;

/// Compiled-in device configuration
const CONFIG: DeviceConfig = DeviceConfig::DEFAULT;

/// Console TX buffer size
const CONSOLE_BUF_SIZE: usize = 64;

/// Shared between the I2C target task and the poller
static DEVICE: BpDevice = BpDevice::new();

// Static cell for the console buffer (must live forever)
static CONSOLE_BUF: StaticCell<[u8; CONSOLE_BUF_SIZE]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("bpmon firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let console = Console::new(
        p.UART0,
        p.PIN_0,
        CONSOLE_BUF.init([0; CONSOLE_BUF_SIZE]),
        &CONFIG.console,
    );
    info!("Console on UART0 at {} baud", CONFIG.console.baudrate);

    let mut target = RpTarget::new(p.I2C0, p.PIN_5, p.PIN_4);
    if let Err(e) = DEVICE.init(&mut target, &CONFIG) {
        error!("Failed to start I2C target: {:?}", e);
        return;
    }
    info!("I2C target listening at {=u8:#x}", CONFIG.address.get());

    spawner.spawn(tasks::i2c_target_task(target)).unwrap();
    spawner
        .spawn(tasks::poller_task(&DEVICE, console, CONFIG.poll_interval_ms))
        .unwrap();

    info!("All tasks spawned");
}
