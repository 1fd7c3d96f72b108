//! I2C target abstractions
//!
//! Provides the capability interface for an I2C target (subordinate)
//! transport. The transport owns the bus protocol and hands received bytes
//! and read requests to registered handlers.

use core::fmt;

/// Size of the transport transmit buffer for one read request
pub const TARGET_BUFFER_SIZE: usize = 32;

/// Errors from address validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Address does not fit in 7 bits
    OutOfRange,
    /// Address is in a range reserved by the I2C bus standard
    Reserved,
}

/// 7-bit I2C target address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Create a validated address
    ///
    /// Rejects values above 0x7F and the reserved blocks 0x00-0x07 and
    /// 0x78-0x7F.
    pub fn new(address: u8) -> Result<Self, AddressError> {
        match address {
            0x80..=0xFF => Err(AddressError::OutOfRange),
            0x00..=0x07 | 0x78..=0x7F => Err(AddressError::Reserved),
            _ => Ok(Self(address)),
        }
    }

    /// Create an address without validation, for compile-time constants
    pub const fn new_unchecked(address: u8) -> Self {
        Self(address)
    }

    /// Raw 7-bit address value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<I2cAddress> for u16 {
    fn from(address: I2cAddress) -> Self {
        address.0 as u16
    }
}

/// Bytes received from the controller, readable from a receive callback
pub trait RxQueue {
    /// Number of bytes still waiting to be read
    fn available(&self) -> usize;

    /// Read the next byte, or `None` once the queue is drained
    fn read(&mut self) -> Option<u8>;
}

/// Outgoing bytes written from a request callback
pub trait TxSink {
    /// Queue bytes for transmission
    ///
    /// Returns how many bytes were accepted. Bytes beyond the transport's
    /// buffer capacity are dropped.
    fn write(&mut self, data: &[u8]) -> usize;
}

/// Callback run when the controller writes bytes to this device
///
/// Runs in interrupt context: it must drain what it needs and return
/// without blocking. Never invoked re-entrantly.
pub trait ReceiveHandler: Sync {
    fn on_receive(&self, rx: &mut dyn RxQueue);
}

/// Callback run when the controller requests bytes from this device
///
/// The response must be written synchronously before returning.
pub trait RequestHandler: Sync {
    fn on_request(&self, tx: &mut dyn TxSink);
}

/// I2C target transport
///
/// Handlers are registered first, then [`ByteTransport::begin`] joins the bus
/// at the given address.
pub trait ByteTransport<'h> {
    /// Error type for transport operations
    type Error;

    /// Register the handler for controller writes
    fn on_receive(&mut self, handler: &'h dyn ReceiveHandler);

    /// Register the handler for controller reads
    fn on_request(&mut self, handler: &'h dyn RequestHandler);

    /// Start responding as a target at `address`
    fn begin(&mut self, address: I2cAddress) -> Result<(), Self::Error>;
}

/// [`RxQueue`] over a slice of received bytes
#[derive(Debug, Clone)]
pub struct SliceQueue<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceQueue<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl RxQueue for SliceQueue<'_> {
    fn available(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }
}

impl<const N: usize> TxSink for heapless::Vec<u8, N> {
    fn write(&mut self, data: &[u8]) -> usize {
        let room = N - self.len();
        let accepted = data.len().min(room);
        self.extend_from_slice(&data[..accepted]).ok();
        accepted
    }
}

/// [`fmt::Write`] adapter that prints into a [`TxSink`]
///
/// Never reports an error; overflow is truncated like any other sink write.
pub struct SinkWriter<'a> {
    sink: &'a mut dyn TxSink,
}

impl<'a> SinkWriter<'a> {
    pub fn new(sink: &'a mut dyn TxSink) -> Self {
        Self { sink }
    }
}

impl fmt::Write for SinkWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sink.write(s.as_bytes());
        Ok(())
    }
}
