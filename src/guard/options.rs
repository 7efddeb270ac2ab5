//! Guard configuration and option resolution
//!
//! A `Config` is seeded with disabled-safe defaults and then adjusted by an
//! ordered list of `WaitOption`s. Each option may reject its input, which
//! aborts resolution with a `ConfigError`.

use super::endpoints::{
    local_addr, DEFAULT_QUIT_ADDR, DEFAULT_QUIT_ENDPOINT, DEFAULT_READY_ENDPOINT,
};
use super::logger::{Discard, Logger, TracingLogger};
use super::sleeper::{Sleeper, TokioSleeper};
use super::transport::{HttpTransport, Transport};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("transport must not be null")]
    NullTransport,

    #[error("invalid {field} port: {port}")]
    InvalidPort { field: &'static str, port: u16 },

    #[error("invalid {field} endpoint: {value:?}")]
    InvalidEndpoint { field: &'static str, value: String },

    #[error("transport timeout must be greater than zero")]
    InvalidTimeout,

    #[error("failed to build transport: {0}")]
    Transport(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// One configuration step applied by `Config::resolve`
pub enum WaitOption {
    /// Probe only `http://localhost:<port><ready endpoint>`
    ReadyPort(u16),
    /// Ready path used together with `ReadyPort` (default `/ready`)
    ReadyEndpoint(String),
    /// Send the quit signal to `http://localhost:<port><quit endpoint>`
    QuitPort(u16),
    /// Shorthand for `ReadyPort` and `QuitPort` on the same port
    Port(u16),
    /// Quit path used together with `QuitPort` (default `/quitquitquit`)
    QuitEndpoint(String),
    /// Also probe the legacy candidate addresses
    Legacy,
    /// Replace the HTTP transport; `None` is rejected
    Transport(Option<Arc<dyn Transport>>),
    /// Use the standard transport with a per-request timeout
    Timeout(Duration),
    /// Replace the diagnostic sink
    Logger(Arc<dyn Logger>),
    /// Send diagnostics to `tracing`
    Debug,
    /// Replace the pause taken between probe rounds
    Sleeper(Arc<dyn Sleeper>),
}

impl fmt::Debug for WaitOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitOption::ReadyPort(p) => f.debug_tuple("ReadyPort").field(p).finish(),
            WaitOption::ReadyEndpoint(e) => f.debug_tuple("ReadyEndpoint").field(e).finish(),
            WaitOption::QuitPort(p) => f.debug_tuple("QuitPort").field(p).finish(),
            WaitOption::Port(p) => f.debug_tuple("Port").field(p).finish(),
            WaitOption::QuitEndpoint(e) => f.debug_tuple("QuitEndpoint").field(e).finish(),
            WaitOption::Legacy => f.write_str("Legacy"),
            WaitOption::Transport(t) => f
                .debug_tuple("Transport")
                .field(&t.as_ref().map(|_| ".."))
                .finish(),
            WaitOption::Timeout(d) => f.debug_tuple("Timeout").field(d).finish(),
            WaitOption::Logger(_) => f.write_str("Logger(..)"),
            WaitOption::Debug => f.write_str("Debug"),
            WaitOption::Sleeper(_) => f.write_str("Sleeper(..)"),
        }
    }
}

impl WaitOption {
    fn apply(self, config: &mut Draft) -> Result<(), ConfigError> {
        match self {
            WaitOption::ReadyPort(port) => {
                config.ready_port = Some(check_port("ready", port)?);
            }
            WaitOption::ReadyEndpoint(endpoint) => {
                config.ready_endpoint = Some(normalize_endpoint("ready", &endpoint)?);
            }
            WaitOption::QuitPort(port) => {
                config.quit_port = Some(check_port("quit", port)?);
            }
            WaitOption::Port(port) => {
                config.ready_port = Some(check_port("ready", port)?);
                config.quit_port = Some(check_port("quit", port)?);
            }
            WaitOption::QuitEndpoint(endpoint) => {
                config.quit_endpoint = Some(normalize_endpoint("quit", &endpoint)?);
            }
            WaitOption::Legacy => config.legacy_fallback = true,
            WaitOption::Transport(transport) => {
                config.transport = Some(transport.ok_or(ConfigError::NullTransport)?);
            }
            WaitOption::Timeout(timeout) => {
                if timeout.is_zero() {
                    return Err(ConfigError::InvalidTimeout);
                }
                let transport = HttpTransport::with_timeout(timeout)
                    .map_err(|e| ConfigError::Transport(e.to_string()))?;
                config.transport = Some(Arc::new(transport));
            }
            WaitOption::Logger(logger) => config.logger = logger,
            WaitOption::Debug => config.logger = Arc::new(TracingLogger),
            WaitOption::Sleeper(sleeper) => config.sleeper = sleeper,
        }
        Ok(())
    }
}

fn check_port(field: &'static str, port: u16) -> Result<u16, ConfigError> {
    if port == 0 {
        return Err(ConfigError::InvalidPort { field, port });
    }
    Ok(port)
}

/// Options accumulate here before addresses are resolved
///
/// The transport stays unset until every option has run so the default
/// HTTP client is only built when nothing replaced it.
struct Draft {
    enabled: bool,
    legacy_fallback: bool,
    ready_port: Option<u16>,
    ready_endpoint: Option<String>,
    quit_port: Option<u16>,
    quit_endpoint: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    logger: Arc<dyn Logger>,
    sleeper: Arc<dyn Sleeper>,
}

impl Draft {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            legacy_fallback: false,
            ready_port: None,
            ready_endpoint: None,
            quit_port: None,
            quit_endpoint: None,
            transport: None,
            logger: Arc::new(Discard),
            sleeper: Arc::new(TokioSleeper),
        }
    }
}

/// Validate a path and make sure it starts with `/`
fn normalize_endpoint(field: &'static str, endpoint: &str) -> Result<String, ConfigError> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidEndpoint {
            field,
            value: endpoint.to_string(),
        });
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{}", trimmed))
    }
}

/// Resolved guard configuration
///
/// Immutable once returned by `resolve`; owned by the `Sidecar` handle.
pub struct Config {
    pub enabled: bool,
    pub legacy_fallback: bool,
    pub ready_port: Option<u16>,
    pub ready_endpoint: Option<String>,
    pub quit_port: Option<u16>,
    pub quit_endpoint: Option<String>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
    ready_addr: Option<String>,
    quit_addr: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("enabled", &self.enabled)
            .field("legacy_fallback", &self.legacy_fallback)
            .field("ready_addr", &self.ready_addr)
            .field("quit_addr", &self.quit_addr)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Apply `options` in order on top of the defaults and resolve addresses
    ///
    /// Options are applied even when `enabled` is false, so a bad option is
    /// reported regardless of the enable condition.
    pub fn resolve(enabled: bool, options: Vec<WaitOption>) -> Result<Self, ConfigError> {
        let mut draft = Draft::new(enabled);
        for option in options {
            option.apply(&mut draft)?;
        }

        let ready_addr = match draft.ready_port {
            Some(port) => Some(local_addr(
                port,
                draft
                    .ready_endpoint
                    .as_deref()
                    .unwrap_or(DEFAULT_READY_ENDPOINT),
            )),
            None => {
                if let Some(endpoint) = &draft.ready_endpoint {
                    warn!(endpoint = %endpoint, "Ready endpoint set without ready port - ignored");
                }
                None
            }
        };

        let quit_addr = match draft.quit_port {
            Some(port) => local_addr(
                port,
                draft
                    .quit_endpoint
                    .as_deref()
                    .unwrap_or(DEFAULT_QUIT_ENDPOINT),
            ),
            None => {
                if let Some(endpoint) = &draft.quit_endpoint {
                    warn!(endpoint = %endpoint, "Quit endpoint set without quit port - ignored");
                }
                DEFAULT_QUIT_ADDR.to_string()
            }
        };

        let transport = match draft.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()),
        };

        Ok(Self {
            enabled: draft.enabled,
            legacy_fallback: draft.legacy_fallback,
            ready_port: draft.ready_port,
            ready_endpoint: draft.ready_endpoint,
            quit_port: draft.quit_port,
            quit_endpoint: draft.quit_endpoint,
            transport,
            logger: draft.logger,
            sleeper: draft.sleeper,
            ready_addr,
            quit_addr,
        })
    }

    /// Explicit ready address, or `None` to probe the candidate table
    pub fn ready_addr(&self) -> Option<&str> {
        self.ready_addr.as_deref()
    }

    /// Address the quit signal is sent to
    pub fn quit_addr(&self) -> &str {
        &self.quit_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::transport::MockTransport;

    #[test]
    fn test_draft_leaves_transport_unset() {
        assert!(Draft::new(true).transport.is_none());
    }

    /// An injected transport replaces the default instead of sitting beside it
    #[test]
    fn test_injected_transport_is_used() {
        let injected: Arc<dyn Transport> = Arc::new(MockTransport::new());
        let config =
            Config::resolve(true, vec![WaitOption::Transport(Some(injected.clone()))]).unwrap();

        assert_eq!(
            Arc::as_ptr(&config.transport) as *const (),
            Arc::as_ptr(&injected) as *const ()
        );
    }
}
