//! Structured logging for chronicat
//!
//! [`init`] installs the subscriber for a [`Profile`]. Engine commands mark
//! their boundaries with [`log_op_start!`](crate::log_op_start),
//! [`log_op_end!`](crate::log_op_end) and [`log_op_error!`](crate::log_op_error);
//! the store and the assembler only emit plain `debug` or `warn` events.
//! Tests read events back through [`init_test_capture`].

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
