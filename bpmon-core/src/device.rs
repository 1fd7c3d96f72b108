//! Device wiring
//!
//! [`BpDevice`] bundles the receiver/poller link with the request responder
//! and attaches both to a transport.

use bpmon_hal::{ByteTransport, UartTx};

use crate::config::DeviceConfig;
use crate::link::BpLink;
use crate::packet::Reading;
use crate::responder::RequestResponder;

/// The blood-pressure I2C target
///
/// Meant to live in a `static` so the transport callbacks and the main
/// loop can share it.
pub struct BpDevice {
    link: BpLink,
    responder: RequestResponder,
}

impl Default for BpDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl BpDevice {
    pub const fn new() -> Self {
        Self {
            link: BpLink::new(),
            responder: RequestResponder::new(),
        }
    }

    /// Register the callbacks and join the bus
    pub fn init<'h, T>(&'h self, transport: &mut T, config: &DeviceConfig) -> Result<(), T::Error>
    where
        T: ByteTransport<'h>,
    {
        transport.on_receive(&self.link);
        transport.on_request(&self.responder);
        transport.begin(config.address)
    }

    /// Main loop step: print the pending reading, if any
    pub fn poll<C: UartTx>(&self, console: &mut C) -> Result<Option<Reading>, C::Error> {
        self.link.poll(console)
    }

    /// Main loop step: print the last raw receive batch, if any
    pub fn poll_raw<C: UartTx>(&self, console: &mut C) -> Result<bool, C::Error> {
        self.link.poll_raw(console)
    }

    pub fn link(&self) -> &BpLink {
        &self.link
    }

    pub fn responder(&self) -> &RequestResponder {
        &self.responder
    }
}
