//! bpmon Hardware Abstraction Layer
//!
//! This crate defines the capability traits the board-agnostic core needs
//! from the hardware. Chip-specific firmware implements them; host tests use
//! the in-memory [`mock::MockTransport`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  bpmon-firmware (RP2040 tasks)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bpmon-core (framing, mailbox, replies) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bpmon-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::ByteTransport`] - I2C target transport with callback registration
//! - [`i2c::ReceiveHandler`], [`i2c::RequestHandler`] - Transport callbacks
//! - [`i2c::RxQueue`], [`i2c::TxSink`] - Byte queues seen by the callbacks
//! - [`uart::UartTx`] - Console output

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use i2c::{
    AddressError, ByteTransport, I2cAddress, ReceiveHandler, RequestHandler, RxQueue, SinkWriter,
    SliceQueue, TxSink, TARGET_BUFFER_SIZE,
};
pub use uart::{UartConfig, UartTx};
