//! RP2040-specific HAL for the bpmon firmware
//!
//! This crate provides RP2040 implementations of the shared `bpmon-hal`
//! traits:
//!
//! - I2C target transport on I2C0 (implements `bpmon_hal::ByteTransport`)
//! - Debug console on UART0 (implements `bpmon_hal::UartTx`)

#![no_std]

pub mod i2c_target;
pub mod uart;

pub use i2c_target::{RpTarget, TargetError, Transaction};
pub use uart::Console;
