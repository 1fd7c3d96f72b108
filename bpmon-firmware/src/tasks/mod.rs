//! Embassy async tasks
//!
//! The I2C target task stands in for the bus interrupt: it runs the
//! receive and request handlers to completion, one transaction at a time.
//! The poller task is the main loop.

pub mod i2c_target;
pub mod poller;

pub use i2c_target::i2c_target_task;
pub use poller::poller_task;
