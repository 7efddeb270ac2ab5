//! Sidecar readiness waiter and quit signaller
//!
//! - `wait` / `wait_until`: block until the sidecar proxy reports ready
//! - `Sidecar::quit`: ask the sidecar to exit on shutdown
//!
//! Transport, logger and inter-round pause are injected through `WaitOption`.

pub mod endpoints;
pub mod logger;
pub mod options;
mod quit;
pub mod sleeper;
pub mod transport;
mod waiter;

pub use endpoints::{Candidate, CANDIDATES, DEFAULT_QUIT_ADDR};
pub use logger::{Discard, Logger, TracingLogger};
pub use options::{Config, ConfigError, WaitOption};
pub use quit::QUIT_CONTENT_TYPE;
pub use sleeper::{Sleeper, TokioSleeper};
pub use transport::{HttpTransport, Transport, TransportError};
pub use waiter::{wait, wait_until, Readiness, Sidecar, POLL_INTERVAL};

#[cfg(test)]
#[path = "options_test.rs"]
mod options_tests;

#[cfg(test)]
#[path = "waiter_test.rs"]
mod waiter_tests;

#[cfg(test)]
#[path = "quit_test.rs"]
mod quit_tests;
