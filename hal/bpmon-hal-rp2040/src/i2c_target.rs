//! I2C target transport on the RP2040 I2C0 block
//!
//! Implements [`bpmon_hal::ByteTransport`] on top of embassy-rp's
//! `I2cSlave`. The peripheral is claimed in [`ByteTransport::begin`], since
//! the address is part of the embassy configuration. Each call to
//! [`RpTarget::serve`] waits for one bus transaction and runs the matching
//! handler to completion.

use embassy_rp::bind_interrupts;
use embassy_rp::i2c;
use embassy_rp::i2c_slave::{self, Command, I2cSlave};
use embassy_rp::peripherals::{I2C0, PIN_4, PIN_5};
use embassy_rp::Peri;
use heapless::Vec;

use bpmon_hal::{
    ByteTransport, I2cAddress, ReceiveHandler, RequestHandler, SliceQueue, TARGET_BUFFER_SIZE,
};

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Byte clocked out when the controller reads past the response
const FILL_BYTE: u8 = 0xFF;

/// Errors from the RP2040 target transport
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetError {
    /// `serve` called before `begin`
    NotStarted,
    /// `begin` called twice
    AlreadyStarted,
    /// No handler registered for the transaction
    NoHandler,
    /// Bus-level failure reported by the peripheral
    Bus(i2c_slave::Error),
}

impl From<i2c_slave::Error> for TargetError {
    fn from(e: i2c_slave::Error) -> Self {
        TargetError::Bus(e)
    }
}

/// One completed bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transaction {
    /// Controller wrote this many bytes
    Received(usize),
    /// Controller wrote more than the receive buffer; the first bytes were kept
    Truncated(usize),
    /// Controller read; this many response bytes were queued
    Responded(usize),
    /// General call, not addressed to this device's handlers
    GeneralCall(usize),
}

/// RP2040 I2C target
pub struct RpTarget<'d, 'h> {
    parts: Option<(Peri<'d, I2C0>, Peri<'d, PIN_5>, Peri<'d, PIN_4>)>,
    i2c: Option<I2cSlave<'d, I2C0>>,
    receive: Option<&'h dyn ReceiveHandler>,
    request: Option<&'h dyn RequestHandler>,
    rx_buf: [u8; TARGET_BUFFER_SIZE],
}

impl<'d, 'h> RpTarget<'d, 'h> {
    /// Claim I2C0 with SCL on GPIO5 and SDA on GPIO4
    pub fn new(i2c: Peri<'d, I2C0>, scl: Peri<'d, PIN_5>, sda: Peri<'d, PIN_4>) -> Self {
        Self {
            parts: Some((i2c, scl, sda)),
            i2c: None,
            receive: None,
            request: None,
            rx_buf: [0; TARGET_BUFFER_SIZE],
        }
    }

    /// Wait for the next transaction and dispatch it
    pub async fn serve(&mut self) -> Result<Transaction, TargetError> {
        let i2c = self.i2c.as_mut().ok_or(TargetError::NotStarted)?;

        match i2c.listen(&mut self.rx_buf).await {
            Ok(Command::Write(len)) => {
                Self::deliver(self.receive, &self.rx_buf[..len])?;
                Ok(Transaction::Received(len))
            }
            Ok(Command::WriteRead(len)) => {
                Self::deliver(self.receive, &self.rx_buf[..len])?;
                let sent = Self::respond(i2c, self.request).await?;
                Ok(Transaction::Responded(sent))
            }
            Ok(Command::Read) => {
                let sent = Self::respond(i2c, self.request).await?;
                Ok(Transaction::Responded(sent))
            }
            Ok(Command::GeneralCall(len)) => Ok(Transaction::GeneralCall(len)),
            Err(i2c_slave::Error::PartialWrite(len)) => {
                Self::deliver(self.receive, &self.rx_buf[..len])?;
                Ok(Transaction::Truncated(len))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn deliver(handler: Option<&'h dyn ReceiveHandler>, bytes: &[u8]) -> Result<(), TargetError> {
        let handler = handler.ok_or(TargetError::NoHandler)?;
        handler.on_receive(&mut SliceQueue::new(bytes));
        Ok(())
    }

    async fn respond(
        i2c: &mut I2cSlave<'d, I2C0>,
        handler: Option<&'h dyn RequestHandler>,
    ) -> Result<usize, TargetError> {
        let handler = handler.ok_or(TargetError::NoHandler)?;
        let mut tx: Vec<u8, TARGET_BUFFER_SIZE> = Vec::new();
        handler.on_request(&mut tx);
        i2c.respond_and_fill(&tx, FILL_BYTE).await?;
        Ok(tx.len())
    }
}

impl<'d, 'h> ByteTransport<'h> for RpTarget<'d, 'h> {
    type Error = TargetError;

    fn on_receive(&mut self, handler: &'h dyn ReceiveHandler) {
        self.receive = Some(handler);
    }

    fn on_request(&mut self, handler: &'h dyn RequestHandler) {
        self.request = Some(handler);
    }

    fn begin(&mut self, address: I2cAddress) -> Result<(), Self::Error> {
        let (i2c, scl, sda) = self.parts.take().ok_or(TargetError::AlreadyStarted)?;

        let mut config = i2c_slave::Config::default();
        config.addr = address.into();
        config.general_call = false;

        self.i2c = Some(I2cSlave::new(i2c, scl, sda, Irqs, config));
        Ok(())
    }
}
