//! Board-agnostic core logic for the bpmon I2C target
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Packet framing over the controller's byte stream
//! - Shared receiver/poller state with a single-slot reading mailbox
//! - Request responder for controller reads
//! - Blood-pressure grading of parsed readings
//! - Device wiring onto a [`bpmon_hal::ByteTransport`]
//! - Configuration type definitions
//!
//! The receive and request handlers run in interrupt context; the poller
//! runs in the main loop. They share a [`device::BpDevice`], usually placed
//! in a `static`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod classify;
pub mod config;
pub mod console;
pub mod device;
pub mod link;
pub mod packet;
pub mod responder;

pub use classify::Category;
pub use config::DeviceConfig;
pub use device::BpDevice;
pub use link::BpLink;
pub use packet::{PacketAccumulator, RawCapture, Reading, ReadingParseError};
pub use responder::RequestResponder;
