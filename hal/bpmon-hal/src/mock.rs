//! In-memory transport and console for host-side testing
//!
//! [`MockTransport`] plays the controller: it feeds synthetic byte batches
//! to the registered receive handler and collects request responses.

use heapless::Vec;

use crate::i2c::{
    ByteTransport, I2cAddress, ReceiveHandler, RequestHandler, SliceQueue, TARGET_BUFFER_SIZE,
};
use crate::uart::UartTx;

/// Errors from the mock transport and console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// Bus activity before `begin`
    NotStarted,
    /// `begin` called twice
    AlreadyStarted,
    /// No handler registered for the event
    NoHandler,
    /// Console capture buffer is full
    ConsoleFull,
}

/// Scripted I2C controller driving registered handlers
pub struct MockTransport<'h> {
    receive: Option<&'h dyn ReceiveHandler>,
    request: Option<&'h dyn RequestHandler>,
    address: Option<I2cAddress>,
}

impl Default for MockTransport<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> MockTransport<'h> {
    pub fn new() -> Self {
        Self {
            receive: None,
            request: None,
            address: None,
        }
    }

    /// Address passed to `begin`, if started
    pub fn address(&self) -> Option<I2cAddress> {
        self.address
    }

    /// Deliver one write transaction to the receive handler
    pub fn deliver(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        self.address.ok_or(MockError::NotStarted)?;
        let handler = self.receive.ok_or(MockError::NoHandler)?;
        handler.on_receive(&mut SliceQueue::new(bytes));
        Ok(())
    }

    /// Issue one read request and return the handler's response
    pub fn request(&mut self) -> Result<Vec<u8, TARGET_BUFFER_SIZE>, MockError> {
        self.address.ok_or(MockError::NotStarted)?;
        let handler = self.request.ok_or(MockError::NoHandler)?;
        let mut response = Vec::new();
        handler.on_request(&mut response);
        Ok(response)
    }
}

impl<'h> ByteTransport<'h> for MockTransport<'h> {
    type Error = MockError;

    fn on_receive(&mut self, handler: &'h dyn ReceiveHandler) {
        self.receive = Some(handler);
    }

    fn on_request(&mut self, handler: &'h dyn RequestHandler) {
        self.request = Some(handler);
    }

    fn begin(&mut self, address: I2cAddress) -> Result<(), Self::Error> {
        if self.address.is_some() {
            return Err(MockError::AlreadyStarted);
        }
        self.address = Some(address);
        Ok(())
    }
}

/// Console that captures everything written to it
#[derive(Debug, Default)]
pub struct MockConsole<const N: usize> {
    buffer: Vec<u8, N>,
}

impl<const N: usize> MockConsole<N> {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Captured output as text
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buffer).unwrap_or("<invalid utf-8>")
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl<const N: usize> UartTx for MockConsole<N> {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.buffer
            .extend_from_slice(data)
            .map_err(|_| MockError::ConsoleFull)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
