//! Device configuration
//!
//! There is no runtime configuration: the firmware builds with
//! [`DeviceConfig::DEFAULT`].

use bpmon_hal::{I2cAddress, UartConfig};

/// Bus address the controller sends sensor packets to
pub const DEVICE_ADDRESS: I2cAddress = I2cAddress::new_unchecked(0x50);

/// Device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// 7-bit target address on the I2C bus
    pub address: I2cAddress,
    /// Debug console settings
    pub console: UartConfig,
    /// Main loop poll period in milliseconds
    pub poll_interval_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl DeviceConfig {
    pub const DEFAULT: Self = Self {
        address: DEVICE_ADDRESS,
        console: UartConfig::CONSOLE,
        poll_interval_ms: 10,
    };

    /// Default configuration at a different bus address
    pub const fn with_address(address: I2cAddress) -> Self {
        Self {
            address,
            ..Self::DEFAULT
        }
    }
}
