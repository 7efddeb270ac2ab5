//! Environment configuration for the `sidecar-guard` binary
//!
//! | variable | meaning |
//! |---|---|
//! | `SIDECAR_GUARD_ENABLED` | enable waiting and quitting (default false) |
//! | `SIDECAR_GUARD_LEGACY` | also probe legacy readiness addresses |
//! | `SIDECAR_GUARD_PORT` | ready and quit port together |
//! | `SIDECAR_GUARD_READY_PORT` / `SIDECAR_GUARD_READY_ENDPOINT` | explicit ready address |
//! | `SIDECAR_GUARD_QUIT_PORT` / `SIDECAR_GUARD_QUIT_ENDPOINT` | explicit quit address |
//! | `SIDECAR_GUARD_TIMEOUT_MS` | per-request transport timeout |
//! | `SIDECAR_GUARD_DEBUG` | send probe diagnostics to the log |

use crate::guard::{ConfigError, WaitOption};
use std::time::Duration;

pub const ENV_ENABLED: &str = "SIDECAR_GUARD_ENABLED";
pub const ENV_LEGACY: &str = "SIDECAR_GUARD_LEGACY";
pub const ENV_PORT: &str = "SIDECAR_GUARD_PORT";
pub const ENV_READY_PORT: &str = "SIDECAR_GUARD_READY_PORT";
pub const ENV_READY_ENDPOINT: &str = "SIDECAR_GUARD_READY_ENDPOINT";
pub const ENV_QUIT_PORT: &str = "SIDECAR_GUARD_QUIT_PORT";
pub const ENV_QUIT_ENDPOINT: &str = "SIDECAR_GUARD_QUIT_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "SIDECAR_GUARD_TIMEOUT_MS";
pub const ENV_DEBUG: &str = "SIDECAR_GUARD_DEBUG";

/// Guard settings as read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardConfig {
    pub enabled: bool,
    pub legacy: bool,
    pub port: Option<u16>,
    pub ready_port: Option<u16>,
    pub ready_endpoint: Option<String>,
    pub quit_port: Option<u16>,
    pub quit_endpoint: Option<String>,
    pub timeout: Option<Duration>,
    pub debug: bool,
}

impl GuardConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            enabled: parse_bool(ENV_ENABLED, get(ENV_ENABLED))?,
            legacy: parse_bool(ENV_LEGACY, get(ENV_LEGACY))?,
            port: parse_port(ENV_PORT, get(ENV_PORT))?,
            ready_port: parse_port(ENV_READY_PORT, get(ENV_READY_PORT))?,
            ready_endpoint: get(ENV_READY_ENDPOINT),
            quit_port: parse_port(ENV_QUIT_PORT, get(ENV_QUIT_PORT))?,
            quit_endpoint: get(ENV_QUIT_ENDPOINT),
            timeout: get(ENV_TIMEOUT_MS)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .map(Duration::from_millis)
                        .map_err(|e| invalid(ENV_TIMEOUT_MS, format!("must be milliseconds: {}", e)))
                })
                .transpose()?,
            debug: parse_bool(ENV_DEBUG, get(ENV_DEBUG))?,
        })
    }

    /// Options for `wait`, in a fixed order
    pub fn options(&self) -> Vec<WaitOption> {
        let mut options = Vec::new();
        if let Some(timeout) = self.timeout {
            options.push(WaitOption::Timeout(timeout));
        }
        if self.debug {
            options.push(WaitOption::Debug);
        }
        if self.legacy {
            options.push(WaitOption::Legacy);
        }
        // Shared port first so the specific ports below override it
        if let Some(port) = self.port {
            options.push(WaitOption::Port(port));
        }
        if let Some(port) = self.ready_port {
            options.push(WaitOption::ReadyPort(port));
        }
        if let Some(endpoint) = &self.ready_endpoint {
            options.push(WaitOption::ReadyEndpoint(endpoint.clone()));
        }
        if let Some(port) = self.quit_port {
            options.push(WaitOption::QuitPort(port));
        }
        if let Some(endpoint) = &self.quit_endpoint {
            options.push(WaitOption::QuitEndpoint(endpoint.clone()));
        }
        options
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

fn parse_bool(key: &str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" => Ok(false),
        Some(v) => Err(invalid(key, format!("must be 'true' or 'false', got {:?}", v))),
    }
}

fn parse_port(key: &str, value: Option<String>) -> Result<Option<u16>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse::<u16>()
                .map_err(|e| invalid(key, format!("must be a port number: {}", e)))
        })
        .transpose()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
