//! Cancellation for the readiness loop
//!
//! The readiness poll has no retry limit. A supervisor that needs to give up
//! early (deadline, SIGTERM during startup) holds a `Canceller` and hands the
//! paired `CancelSignal` to `wait_until`.

use tokio::sync::watch;
use tracing::info;

/// Receiving half of the cancellation pair
///
/// Cloned signals share state. `CancelSignal::never()` is a signal with no
/// controller that never fires.
#[derive(Clone)]
pub struct CancelSignal {
    receiver: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that is never cancelled
    pub fn never() -> Self {
        Self { receiver: None }
    }

    /// Wait for cancellation
    pub async fn wait(&mut self) {
        let Some(receiver) = self.receiver.as_mut() else {
            return std::future::pending().await;
        };
        // Wait until the value becomes true
        while !*receiver.borrow() {
            if receiver.changed().await.is_err() {
                // Canceller dropped without firing: nothing can cancel us now
                return std::future::pending().await;
            }
        }
    }

    /// Check if cancellation was requested (non-blocking)
    pub fn is_cancelled(&self) -> bool {
        self.receiver.as_ref().is_some_and(|r| *r.borrow())
    }
}

/// Controller for triggering cancellation
pub struct Canceller {
    sender: watch::Sender<bool>,
}

impl Canceller {
    /// Request cancellation of every paired signal
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
        info!("Sidecar wait cancellation requested");
    }
}

/// Create a new cancellation pair
///
/// Returns (canceller, signal) where:
/// - canceller: Used to stop the readiness loop
/// - signal: Passed to `wait_until`
pub fn cancel_channel() -> (Canceller, CancelSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        Canceller { sender },
        CancelSignal {
            receiver: Some(receiver),
        },
    )
}

/// Wait for SIGTERM or SIGINT signal
///
/// Returns the signal name that was received. If the handlers cannot be
/// registered this never resolves, leaving the caller uncancelled.
///
/// Registering the handlers replaces the default terminate action for the
/// rest of the process: SIGTERM/SIGINT no longer kill it. Callers must turn
/// the returned signal into cancellation (`Canceller::cancel`) or exit
/// themselves.
#[cfg(unix)]
pub async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};
    use tracing::error;

    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to register signal handlers");
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
            "SIGTERM"
        }
        _ = sigint.recv() => {
            info!("Received SIGINT");
            "SIGINT"
        }
    }
}

/// Wait for Ctrl+C signal (Windows)
///
/// Like the unix variant, listening for Ctrl+C stops it from terminating
/// the process.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> &'static str {
    use tracing::error;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to wait for Ctrl+C");
        return std::future::pending().await;
    }
    info!("Received Ctrl+C");
    "CTRL_C"
}
