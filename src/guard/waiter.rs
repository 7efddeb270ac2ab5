//! Readiness waiter
//!
//! Polls the sidecar's readiness endpoint at a fixed interval until it
//! answers 200. There is no retry limit: startup must not proceed without
//! the sidecar. A `CancelSignal` is the only way out besides readiness.

use super::endpoints::candidate_addrs;
use super::options::{Config, ConfigError, WaitOption};
use crate::lifecycle::CancelSignal;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause between probe rounds
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Readiness state recorded on a `Sidecar` handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Waiting was disabled; no probe was sent
    Disabled,
    /// Resolved with `Sidecar::resolve`; readiness was never checked
    Unprobed,
    /// The sidecar answered 200 at `addr`
    Ready { addr: String },
    /// The cancel signal fired before the sidecar became ready
    Cancelled,
}

/// Handle returned by the waiter, used later to quit the sidecar
#[derive(Debug)]
pub struct Sidecar {
    pub(crate) config: Config,
    readiness: Readiness,
}

impl Sidecar {
    /// Resolve configuration without probing
    ///
    /// For processes that only send the quit signal, such as a shutdown hook
    /// running separately from the process that waited.
    pub fn resolve(enabled: bool, options: Vec<WaitOption>) -> Result<Self, ConfigError> {
        let config = Config::resolve(enabled, options)?;
        let readiness = if config.enabled {
            Readiness::Unprobed
        } else {
            Readiness::Disabled
        };
        Ok(Self { config, readiness })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.readiness, Readiness::Ready { .. })
    }
}

/// Wait for the sidecar to report ready
///
/// Returns immediately when `enabled` is false. Otherwise blocks until a
/// readiness probe succeeds.
///
/// # Errors
/// Returns `ConfigError` if any option rejects its input.
pub async fn wait(enabled: bool, options: Vec<WaitOption>) -> Result<Sidecar, ConfigError> {
    wait_until(enabled, options, CancelSignal::never()).await
}

/// Like `wait`, but gives up with `Readiness::Cancelled` once `cancel` fires
///
/// Cancellation also interrupts a probe that is still waiting on the
/// transport.
pub async fn wait_until(
    enabled: bool,
    options: Vec<WaitOption>,
    cancel: CancelSignal,
) -> Result<Sidecar, ConfigError> {
    let config = Config::resolve(enabled, options)?;

    let readiness = if config.enabled {
        poll(&config, cancel).await
    } else {
        debug!("Sidecar wait disabled");
        Readiness::Disabled
    };

    Ok(Sidecar { config, readiness })
}

/// Probe `addr` once; any failure is reported through the logger
async fn probe(config: &Config, addr: &str) -> bool {
    match config.transport.get(addr).await {
        Ok(status) if status == StatusCode::OK => true,
        Ok(status) => {
            debug!(addr = %addr, status = %status, "Sidecar not ready");
            config.logger.log(&format!("GET {} - {}", addr, status));
            false
        }
        Err(e) => {
            debug!(addr = %addr, error = %e, "Sidecar readiness probe failed");
            config.logger.log(&format!("GET {} - {}", addr, e));
            false
        }
    }
}

async fn poll(config: &Config, mut cancel: CancelSignal) -> Readiness {
    // An explicit address is retried on its own; no fallback
    let addrs = match config.ready_addr() {
        Some(addr) => vec![addr.to_string()],
        None => candidate_addrs(config.legacy_fallback),
    };

    info!(candidates = ?addrs, "Waiting for sidecar readiness");

    loop {
        for addr in &addrs {
            if cancel.is_cancelled() {
                warn!("Sidecar wait cancelled before readiness");
                return Readiness::Cancelled;
            }
            // A probe can hang on a sidecar that accepts but never answers
            let ready = tokio::select! {
                biased;
                _ = cancel.wait() => {
                    warn!(addr = %addr, "Sidecar wait cancelled during probe");
                    return Readiness::Cancelled;
                }
                ready = probe(config, addr) => ready,
            };
            if ready {
                info!(addr = %addr, "Sidecar ready");
                return Readiness::Ready { addr: addr.clone() };
            }
        }

        tokio::select! {
            biased;
            _ = cancel.wait() => {
                warn!("Sidecar wait cancelled before readiness");
                return Readiness::Cancelled;
            }
            _ = config.sleeper.sleep(POLL_INTERVAL) => {}
        }
    }
}
