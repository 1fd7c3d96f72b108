//! Debug console line output
//!
//! Lines end in `"\r\n"` so serial terminals and the host application's
//! `readline` both split them.

use core::fmt::{self, Write};

use bpmon_hal::UartTx;

use crate::packet::Reading;

/// Line terminator
pub const LINE_END: &str = "\r\n";

/// Prefix of the raw capture dump
pub const RAW_PREFIX: &str = "DEBUG RAW: ";

/// [`fmt::Write`] adapter over a [`UartTx`], keeping the first UART error
struct ConsoleWriter<'a, C: UartTx> {
    console: &'a mut C,
    error: Option<C::Error>,
}

impl<'a, C: UartTx> ConsoleWriter<'a, C> {
    fn new(console: &'a mut C) -> Self {
        Self {
            console,
            error: None,
        }
    }

    /// UART error that interrupted formatting, if any
    fn into_result(self) -> Result<(), C::Error> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<C: UartTx> Write for ConsoleWriter<'_, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.error.is_some() {
            return Err(fmt::Error);
        }
        self.console.write_blocking(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

/// Print a reading as `SYS=DIA=BPM`
pub fn write_reading<C: UartTx>(console: &mut C, reading: &Reading) -> Result<(), C::Error> {
    let mut writer = ConsoleWriter::new(console);
    write!(writer, "{}{}", reading, LINE_END).ok();
    writer.into_result()?;
    console.flush()
}

/// Print a raw capture as `DEBUG RAW: 48 120 80 ` with one value per byte
pub fn write_raw<C: UartTx>(console: &mut C, raw: &[u8]) -> Result<(), C::Error> {
    let mut writer = ConsoleWriter::new(console);
    writer.write_str(RAW_PREFIX).ok();
    for byte in raw {
        write!(writer, "{} ", byte).ok();
    }
    writer.write_str(LINE_END).ok();
    writer.into_result()?;
    console.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpmon_hal::mock::{MockConsole, MockError};

    #[test]
    fn test_reading_line() {
        let mut console = MockConsole::<64>::new();
        write_reading(&mut console, &Reading::new(120, 80, 72)).unwrap();
        assert_eq!(console.as_str(), "120=80=72\r\n");
    }

    #[test]
    fn test_raw_line() {
        let mut console = MockConsole::<64>::new();
        write_raw(&mut console, &[48, 120, 80]).unwrap();
        assert_eq!(console.as_str(), "DEBUG RAW: 48 120 80 \r\n");
    }

    #[test]
    fn test_console_error_propagates() {
        let mut console = MockConsole::<4>::new();
        assert_eq!(
            write_reading(&mut console, &Reading::new(120, 80, 72)),
            Err(MockError::ConsoleFull)
        );
    }
}
