//! Shared state between the packet receiver and the poller
//!
//! The receiver runs in interrupt context and is the only writer of the
//! accumulator, the raw snapshot and the mailbox. The poller runs in the
//! main loop and only takes from the mailbox. The mailbox holds one reading:
//! a newer packet overwrites one that has not been polled yet.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

use bpmon_hal::{ReceiveHandler, RxQueue, UartTx};

use crate::console;
use crate::packet::{PacketAccumulator, RawCapture, Reading};

/// State owned by the receiver
struct ReceiverState {
    accumulator: PacketAccumulator,
    raw: RawCapture,
}

/// Receiver/poller link
pub struct BpLink {
    receiver: Mutex<CriticalSectionRawMutex, RefCell<ReceiverState>>,
    reading: Signal<CriticalSectionRawMutex, Reading>,
    raw_ready: AtomicBool,
}

impl Default for BpLink {
    fn default() -> Self {
        Self::new()
    }
}

impl BpLink {
    pub const fn new() -> Self {
        Self {
            receiver: Mutex::new(RefCell::new(ReceiverState {
                accumulator: PacketAccumulator::new(),
                raw: RawCapture::new(),
            })),
            reading: Signal::new(),
            raw_ready: AtomicBool::new(false),
        }
    }

    /// Drain every byte the transport has queued
    ///
    /// The first bytes of the batch replace the raw snapshot. Every packet
    /// completed in the batch is published; only the last one survives.
    pub fn receive(&self, rx: &mut dyn RxQueue) {
        self.receiver.lock(|state| {
            let mut state = state.borrow_mut();
            let ReceiverState { accumulator, raw } = &mut *state;

            raw.clear();
            while let Some(byte) = rx.read() {
                if !raw.is_full() {
                    raw.push(byte).ok();
                }
                if let Some(reading) = accumulator.feed(byte) {
                    self.reading.signal(reading);
                }
            }
        });
        self.raw_ready.store(true, Ordering::Release);
    }

    /// Whether a reading is waiting in the mailbox
    pub fn has_reading(&self) -> bool {
        self.reading.signaled()
    }

    /// Take the pending reading, clearing the mailbox
    pub fn take_reading(&self) -> Option<Reading> {
        self.reading.try_take()
    }

    /// Take the raw snapshot of the last receive batch, if not yet taken
    pub fn take_raw(&self) -> Option<RawCapture> {
        if !self.raw_ready.swap(false, Ordering::AcqRel) {
            return None;
        }
        Some(self.receiver.lock(|state| state.borrow().raw.clone()))
    }

    /// Print the pending reading, if any
    ///
    /// Never blocks waiting for data. The reading is consumed even if the
    /// console write fails.
    pub fn poll<C: UartTx>(&self, console: &mut C) -> Result<Option<Reading>, C::Error> {
        let Some(reading) = self.take_reading() else {
            return Ok(None);
        };
        console::write_reading(console, &reading)?;
        Ok(Some(reading))
    }

    /// Print the raw snapshot of the last receive batch, if any
    pub fn poll_raw<C: UartTx>(&self, console: &mut C) -> Result<bool, C::Error> {
        let Some(raw) = self.take_raw() else {
            return Ok(false);
        };
        console::write_raw(console, &raw)?;
        Ok(true)
    }
}

impl ReceiveHandler for BpLink {
    fn on_receive(&self, rx: &mut dyn RxQueue) {
        self.receive(rx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpmon_hal::mock::MockConsole;
    use bpmon_hal::SliceQueue;
    use proptest::prelude::*;

    use crate::packet::HEADER_BYTE;

    fn deliver(link: &BpLink, bytes: &[u8]) {
        link.receive(&mut SliceQueue::new(bytes));
    }

    #[test]
    fn test_poll_prints_reading() {
        let link = BpLink::new();
        let mut console = MockConsole::<64>::new();

        deliver(&link, &[48, 120, 80, 72, 99]);
        assert!(link.has_reading());
        assert_eq!(link.poll(&mut console), Ok(Some(Reading::new(120, 80, 72))));
        assert_eq!(console.as_str(), "120=80=72\r\n");
        assert!(!link.has_reading());
    }

    #[test]
    fn test_poll_without_reading_is_silent() {
        let link = BpLink::new();
        let mut console = MockConsole::<64>::new();
        assert_eq!(link.poll(&mut console), Ok(None));
        assert_eq!(console.as_str(), "");
    }

    #[test]
    fn test_reading_consumed_once() {
        let link = BpLink::new();
        let mut console = MockConsole::<64>::new();

        deliver(&link, &[48, 1, 2, 3, 4]);
        assert!(link.poll(&mut console).unwrap().is_some());
        assert_eq!(link.poll(&mut console), Ok(None));
        assert_eq!(console.as_str(), "1=2=3\r\n");
    }

    #[test]
    fn test_unpolled_reading_is_overwritten() {
        let link = BpLink::new();
        let mut console = MockConsole::<64>::new();

        deliver(&link, &[48, 110, 70, 60, 0]);
        deliver(&link, &[48, 130, 90, 80, 0]);
        assert_eq!(link.poll(&mut console), Ok(Some(Reading::new(130, 90, 80))));
        assert_eq!(link.poll(&mut console), Ok(None));
        assert_eq!(console.as_str(), "130=90=80\r\n");
    }

    #[test]
    fn test_two_packets_in_one_batch() {
        let link = BpLink::new();
        deliver(&link, &[48, 110, 70, 60, 0, 48, 130, 90, 80, 0]);
        assert_eq!(link.take_reading(), Some(Reading::new(130, 90, 80)));
        assert_eq!(link.take_reading(), None);
    }

    #[test]
    fn test_short_packet_publishes_nothing() {
        let link = BpLink::new();
        let mut console = MockConsole::<64>::new();

        deliver(&link, &[48, 120, 80]);
        assert!(!link.has_reading());
        assert_eq!(link.poll(&mut console), Ok(None));
        assert_eq!(console.as_str(), "");
    }

    #[test]
    fn test_packet_across_batches() {
        let link = BpLink::new();
        deliver(&link, &[48, 120]);
        assert!(!link.has_reading());
        deliver(&link, &[80, 72, 0]);
        assert_eq!(link.take_reading(), Some(Reading::new(120, 80, 72)));
    }

    #[test]
    fn test_stray_header_restarts_packet() {
        let link = BpLink::new();
        deliver(&link, &[48, 120, 48, 81, 71, 61]);
        assert!(!link.has_reading());
        deliver(&link, &[0]);
        assert_eq!(link.take_reading(), Some(Reading::new(81, 71, 61)));
    }

    #[test]
    fn test_raw_snapshot_keeps_first_bytes_of_batch() {
        let link = BpLink::new();
        deliver(&link, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        let raw = link.take_raw().unwrap();
        assert_eq!(raw.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(link.take_raw(), None);
    }

    #[test]
    fn test_raw_snapshot_replaced_each_batch() {
        let link = BpLink::new();
        deliver(&link, &[1, 2, 3, 4]);
        deliver(&link, &[9, 8]);
        assert_eq!(link.take_raw().unwrap().as_slice(), &[9, 8]);
    }

    #[test]
    fn test_raw_snapshot_of_empty_batch() {
        let link = BpLink::new();
        deliver(&link, &[]);
        assert_eq!(link.take_raw().unwrap().len(), 0);
    }

    #[test]
    fn test_poll_raw_prints_dump() {
        let link = BpLink::new();
        let mut console = MockConsole::<64>::new();

        assert_eq!(link.poll_raw(&mut console), Ok(false));
        deliver(&link, &[48, 120, 80, 72, 99]);
        assert_eq!(link.poll_raw(&mut console), Ok(true));
        assert_eq!(console.as_str(), "DEBUG RAW: 48 120 80 72 99 \r\n");
        // Dump does not consume the reading
        assert!(link.has_reading());
    }

    proptest! {
        #[test]
        fn prop_poll_reports_offsets_after_header(
            noise in proptest::collection::vec(any::<u8>().prop_filter("no header", |b| *b != HEADER_BYTE), 0..8),
            fields in proptest::collection::vec(any::<u8>().prop_filter("no header", |b| *b != HEADER_BYTE), 4..6),
        ) {
            let link = BpLink::new();
            let mut stream = std::vec::Vec::new();
            stream.extend_from_slice(&noise);
            stream.push(HEADER_BYTE);
            stream.extend_from_slice(&fields);
            deliver(&link, &stream);

            let mut console = MockConsole::<64>::new();
            let reading = link.poll(&mut console).unwrap();
            prop_assert_eq!(reading, Some(Reading::new(fields[0], fields[1], fields[2])));
        }
    }
}
