//! Reply to controller read requests
//!
//! Each request is answered with `"<n> Packets."`, where `n` counts the
//! requests answered so far. The counter is unrelated to received packets.

use core::fmt::Write;

use portable_atomic::{AtomicU32, Ordering};

use bpmon_hal::{RequestHandler, SinkWriter, TxSink};

/// Text following the counter in every response
pub const RESPONSE_SUFFIX: &str = " Packets.";

/// Request responder
pub struct RequestResponder {
    counter: AtomicU32,
}

impl Default for RequestResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestResponder {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
        }
    }

    /// Value the next response will carry
    pub fn count(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Write one response and advance the counter
    ///
    /// The counter wraps at `u32::MAX`.
    pub fn respond(&self, tx: &mut dyn TxSink) {
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        // SinkWriter never fails; overflow is dropped by the sink
        write!(SinkWriter::new(tx), "{}{}", count, RESPONSE_SUFFIX).ok();
    }
}

impl RequestHandler for RequestResponder {
    fn on_request(&self, tx: &mut dyn TxSink) {
        self.respond(tx);
    }
}
