//! Packet framing for the blood-pressure sensor stream
//!
//! Packet format (controller → device):
//! - HEADER (1 byte): ASCII `'0'` (48), marks the start of a packet
//! - SYS (1 byte): systolic value, raw byte code
//! - DIA (1 byte): diastolic value, raw byte code
//! - BPM (1 byte): pulse value, raw byte code
//! - RESERVED (1 byte): accumulated, unused
//!
//! A header byte always restarts the packet, even in the middle of one.
//! Values are not range checked.

use core::fmt;
use core::str::FromStr;

use heapless::Vec;

/// Packet start marker
pub const HEADER_BYTE: u8 = b'0';

/// Capacity of the per-receive diagnostic snapshot
pub const RAW_CAPACITY: usize = 10;

/// Capacity of the packet accumulator
pub const PACKET_CAPACITY: usize = 32;

/// Complete packet length, header included
pub const PACKET_LEN: usize = 5;

/// Offset of the systolic byte from the header
pub const SYSTOLIC_OFFSET: usize = 1;

/// Offset of the diastolic byte from the header
pub const DIASTOLIC_OFFSET: usize = 2;

/// Offset of the pulse byte from the header
pub const PULSE_OFFSET: usize = 3;

const _: () = assert!(PACKET_LEN <= PACKET_CAPACITY);

/// Diagnostic copy of the first bytes of one receive batch
pub type RawCapture = Vec<u8, RAW_CAPACITY>;

/// One parsed sensor reading
///
/// Each field is the raw byte code at its packet offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Systolic pressure
    pub systolic: u8,
    /// Diastolic pressure
    pub diastolic: u8,
    /// Pulse rate
    pub pulse: u8,
}

impl Reading {
    pub const fn new(systolic: u8, diastolic: u8, pulse: u8) -> Self {
        Self {
            systolic,
            diastolic,
            pulse,
        }
    }

    /// Extract the fields from a complete packet
    fn from_packet(packet: &[u8; PACKET_LEN]) -> Self {
        Self {
            systolic: packet[SYSTOLIC_OFFSET],
            diastolic: packet[DIASTOLIC_OFFSET],
            pulse: packet[PULSE_OFFSET],
        }
    }
}

/// Console line format: `SYS=DIA=BPM`
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}={}", self.systolic, self.diastolic, self.pulse)
    }
}

/// Errors parsing a console line back into a [`Reading`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadingParseError {
    /// Fewer than three `=`-separated fields
    MissingField,
    /// More than three fields
    ExtraField,
    /// A field is not a decimal byte value
    InvalidNumber,
}

impl FromStr for Reading {
    type Err = ReadingParseError;

    /// Parse a console line, ignoring surrounding whitespace and line endings
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.trim().split('=');
        let mut next = || -> Result<u8, ReadingParseError> {
            fields
                .next()
                .ok_or(ReadingParseError::MissingField)?
                .parse()
                .map_err(|_| ReadingParseError::InvalidNumber)
        };

        let reading = Self::new(next()?, next()?, next()?);
        if fields.next().is_some() {
            return Err(ReadingParseError::ExtraField);
        }
        Ok(reading)
    }
}

/// Accumulates bytes from a header until a packet is complete
#[derive(Debug, Clone)]
pub struct PacketAccumulator {
    buffer: [u8; PACKET_CAPACITY],
    len: usize,
    accumulating: bool,
}

impl Default for PacketAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketAccumulator {
    /// Create an idle accumulator
    pub const fn new() -> Self {
        Self {
            buffer: [0; PACKET_CAPACITY],
            len: 0,
            accumulating: false,
        }
    }

    /// Drop any partial packet and wait for the next header
    pub fn reset(&mut self) {
        self.len = 0;
        self.accumulating = false;
    }

    /// Bytes accumulated for the current packet
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a header has been seen and the packet is not yet complete
    pub fn is_accumulating(&self) -> bool {
        self.accumulating
    }

    /// Feed a single byte
    ///
    /// Returns the reading when this byte completes a packet. Bytes outside
    /// a packet are ignored.
    pub fn feed(&mut self, byte: u8) -> Option<Reading> {
        if byte == HEADER_BYTE {
            self.accumulating = true;
            self.len = 0;
        }

        if !self.accumulating {
            return None;
        }

        match self.buffer.get_mut(self.len) {
            Some(slot) => *slot = byte,
            None => {
                self.reset();
                return None;
            }
        }
        self.len += 1;

        if self.len < PACKET_LEN {
            return None;
        }

        let mut packet = [0u8; PACKET_LEN];
        packet.copy_from_slice(&self.buffer[..PACKET_LEN]);
        self.reset();
        Some(Reading::from_packet(&packet))
    }

    /// Feed multiple bytes
    ///
    /// All bytes are consumed. Returns the last reading completed, if any.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Reading> {
        bytes.iter().fold(None, |last, &byte| self.feed(byte).or(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use proptest::prelude::*;

    #[test]
    fn test_complete_packet() {
        let mut acc = PacketAccumulator::new();
        assert_eq!(
            acc.feed_bytes(&[48, 120, 80, 72, 99]),
            Some(Reading::new(120, 80, 72))
        );
        assert!(!acc.is_accumulating());
        assert!(acc.is_empty());
    }

    #[test]
    fn test_header_is_stored_as_first_byte() {
        let mut acc = PacketAccumulator::new();
        assert_eq!(acc.feed(HEADER_BYTE), None);
        assert!(acc.is_accumulating());
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_ignores_bytes_before_header() {
        let mut acc = PacketAccumulator::new();
        assert_eq!(acc.feed_bytes(&[1, 2, 3, 4, 5, 6]), None);
        assert!(!acc.is_accumulating());
        assert_eq!(
            acc.feed_bytes(&[7, 48, 10, 20, 30, 40]),
            Some(Reading::new(10, 20, 30))
        );
    }

    #[test]
    fn test_truncated_packet_stalls() {
        let mut acc = PacketAccumulator::new();
        assert_eq!(acc.feed_bytes(&[48, 120, 80, 72]), None);
        assert!(acc.is_accumulating());
        assert_eq!(acc.len(), 4);
    }

    #[test]
    fn test_stray_header_restarts_packet() {
        let mut acc = PacketAccumulator::new();
        // Header at accumulator position 2 wins over the packet in progress
        assert_eq!(acc.feed_bytes(&[48, 1, 48]), None);
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.feed_bytes(&[2, 3, 4, 5]), Some(Reading::new(2, 3, 4)));
    }

    #[test]
    fn test_packet_split_across_batches() {
        let mut acc = PacketAccumulator::new();
        assert_eq!(acc.feed_bytes(&[48, 130]), None);
        assert_eq!(acc.feed_bytes(&[85, 66, 0]), Some(Reading::new(130, 85, 66)));
    }

    #[test]
    fn test_high_byte_values_are_not_filtered() {
        let mut acc = PacketAccumulator::new();
        assert_eq!(
            acc.feed_bytes(&[48, 255, 0, 200, 1]),
            Some(Reading::new(255, 0, 200))
        );
    }

    #[test]
    fn test_display_format() {
        let mut line: heapless::String<16> = heapless::String::new();
        write!(line, "{}", Reading::new(120, 80, 72)).unwrap();
        assert_eq!(line.as_str(), "120=80=72");
    }

    #[test]
    fn test_parse_console_line() {
        assert_eq!("120=80=72\r\n".parse::<Reading>(), Ok(Reading::new(120, 80, 72)));
        assert_eq!(
            "120=80".parse::<Reading>(),
            Err(ReadingParseError::MissingField)
        );
        assert_eq!(
            "120=80=72=1".parse::<Reading>(),
            Err(ReadingParseError::ExtraField)
        );
        assert_eq!(
            "120=eighty=72".parse::<Reading>(),
            Err(ReadingParseError::InvalidNumber)
        );
        assert_eq!(
            "120=80=300".parse::<Reading>(),
            Err(ReadingParseError::InvalidNumber)
        );
    }

    fn payload_byte() -> impl Strategy<Value = u8> {
        any::<u8>().prop_filter("payload must not be a header", |b| *b != HEADER_BYTE)
    }

    proptest! {
        #[test]
        fn prop_reports_offsets_after_last_header(
            noise in proptest::collection::vec(payload_byte(), 0..16),
            payload in proptest::collection::vec(payload_byte(), 4..8),
        ) {
            let mut acc = PacketAccumulator::new();
            acc.feed_bytes(&noise);
            let mut reading = acc.feed(HEADER_BYTE);
            for &byte in &payload {
                reading = acc.feed(byte).or(reading);
            }
            prop_assert_eq!(
                reading,
                Some(Reading::new(payload[0], payload[1], payload[2]))
            );
        }

        #[test]
        fn prop_short_packet_never_completes(
            payload in proptest::collection::vec(payload_byte(), 0..4),
        ) {
            let mut acc = PacketAccumulator::new();
            acc.feed(HEADER_BYTE);
            prop_assert_eq!(acc.feed_bytes(&payload), None);
            prop_assert_eq!(acc.len(), payload.len() + 1);
        }

        #[test]
        fn prop_length_stays_below_packet_len(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut acc = PacketAccumulator::new();
            for byte in bytes {
                acc.feed(byte);
                prop_assert!(acc.len() < PACKET_LEN);
            }
        }

        #[test]
        fn prop_display_parses_back(systolic: u8, diastolic: u8, pulse: u8) {
            let reading = Reading::new(systolic, diastolic, pulse);
            let mut line: heapless::String<16> = heapless::String::new();
            write!(line, "{}", reading).unwrap();
            prop_assert_eq!(line.parse::<Reading>(), Ok(reading));
        }
    }
}
