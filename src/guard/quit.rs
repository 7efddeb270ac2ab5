//! Quit signaller
//!
//! Best-effort: one POST, no retry. Failures are dropped so that process
//! teardown never blocks or fails on the sidecar.

use super::waiter::Sidecar;
use tracing::{debug, info};

/// Content type sent with the quit request
pub const QUIT_CONTENT_TYPE: &str = "application/json";

impl Sidecar {
    /// Ask the sidecar to exit
    ///
    /// No-op when waiting was disabled. Safe to call more than once.
    pub async fn quit(&self) {
        if !self.config.enabled {
            return;
        }

        let addr = self.config.quit_addr();
        match self
            .config
            .transport
            .post(addr, QUIT_CONTENT_TYPE, Vec::new())
            .await
        {
            Ok(status) => {
                info!(addr = %addr, status = %status, "Sidecar quit signal sent");
                self.config.logger.log(&format!("POST {} - {}", addr, status));
            }
            Err(e) => {
                // Not surfaced through the logger and never retried
                debug!(addr = %addr, error = %e, "Sidecar quit signal failed");
            }
        }
    }
}
