//! Process lifecycle plumbing around the guard
//!
//! - Cancellation hook for the readiness loop
//! - SIGTERM/SIGINT handling for the binary

pub mod cancel;

pub use cancel::{cancel_channel, wait_for_signal, CancelSignal, Canceller};

#[cfg(test)]
#[path = "cancel_test.rs"]
mod cancel_tests;
