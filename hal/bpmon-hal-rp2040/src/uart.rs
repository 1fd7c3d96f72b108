//! Debug console on RP2040 UART0
//!
//! TX-only buffered UART; the device never reads from the console.

use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{PIN_0, UART0};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUartTx};
use embassy_rp::Peri;

use bpmon_hal::uart::{DataBits, Parity, StopBits};
use bpmon_hal::{UartConfig, UartTx};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Console over any blocking [`embedded_io::Write`] transmitter
pub struct Console<W> {
    tx: W,
}

impl<W: embedded_io::Write> Console<W> {
    pub fn from_writer(tx: W) -> Self {
        Self { tx }
    }
}

impl Console<BufferedUartTx> {
    /// Console on UART0 with TX on GPIO0
    pub fn new(
        uart: Peri<'static, UART0>,
        tx_pin: Peri<'static, PIN_0>,
        tx_buffer: &'static mut [u8],
        config: &UartConfig,
    ) -> Self {
        Self::from_writer(BufferedUartTx::new(
            uart,
            Irqs,
            tx_pin,
            tx_buffer,
            rp_config(config),
        ))
    }
}

impl<W: embedded_io::Write> UartTx for Console<W> {
    type Error = W::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.flush()
    }
}

/// Translate the board-agnostic settings into embassy-rp's config
fn rp_config(config: &UartConfig) -> uart::Config {
    let mut rp = uart::Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    rp.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    rp
}
