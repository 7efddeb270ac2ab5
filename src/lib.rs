//! Sidecar lifecycle guard
//!
//! Blocks workload startup until the colocated proxy sidecar reports ready,
//! and asks the sidecar to exit when the workload shuts down.
//!
//! ```ignore
//! let sidecar = sidecar_guard::wait(true, vec![WaitOption::Legacy]).await?;
//! run_workload().await;
//! sidecar.quit().await;
//! ```

pub mod config;
pub mod guard;
pub mod lifecycle;

pub use guard::{
    wait, wait_until, Config, ConfigError, Readiness, Sidecar, WaitOption, CANDIDATES,
    DEFAULT_QUIT_ADDR, POLL_INTERVAL,
};
pub use lifecycle::{cancel_channel, CancelSignal, Canceller};
