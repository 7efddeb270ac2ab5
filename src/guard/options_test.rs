//! Tests for option resolution

use super::endpoints::DEFAULT_QUIT_ADDR;
use super::logger::MockLogger;
use super::options::*;
use super::transport::{MockTransport, Transport};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_defaults_have_no_overrides() {
    let config = Config::resolve(true, vec![]).unwrap();

    assert!(config.enabled);
    assert!(!config.legacy_fallback);
    assert_eq!(config.ready_addr(), None);
    assert_eq!(config.quit_addr(), DEFAULT_QUIT_ADDR);
}

#[test]
fn test_ready_port_uses_default_endpoint() {
    let config = Config::resolve(true, vec![WaitOption::ReadyPort(15000)]).unwrap();

    assert_eq!(config.ready_addr(), Some("http://localhost:15000/ready"));
}

#[test]
fn test_ready_port_and_endpoint() {
    let config = Config::resolve(
        true,
        vec![
            WaitOption::ReadyEndpoint("/healthz/ready".into()),
            WaitOption::ReadyPort(15021),
        ],
    )
    .unwrap();

    assert_eq!(config.ready_addr(), Some("http://localhost:15021/healthz/ready"));
}

#[test]
fn test_quit_port_uses_default_endpoint() {
    let config = Config::resolve(true, vec![WaitOption::QuitPort(15020)]).unwrap();

    assert_eq!(config.quit_addr(), "http://localhost:15020/quitquitquit");
}

/// The quit endpoint option must only touch the quit address
#[test]
fn test_quit_endpoint_does_not_touch_ready_address() {
    let config = Config::resolve(
        true,
        vec![
            WaitOption::ReadyPort(15000),
            WaitOption::QuitPort(15020),
            WaitOption::QuitEndpoint("/shutdown".into()),
        ],
    )
    .unwrap();

    assert_eq!(config.ready_addr(), Some("http://localhost:15000/ready"));
    assert_eq!(config.quit_addr(), "http://localhost:15020/shutdown");
    assert_eq!(config.ready_endpoint, None);
}

#[test]
fn test_endpoint_without_port_keeps_defaults() {
    let config = Config::resolve(
        true,
        vec![
            WaitOption::ReadyEndpoint("/other".into()),
            WaitOption::QuitEndpoint("/other".into()),
        ],
    )
    .unwrap();

    assert_eq!(config.ready_addr(), None);
    assert_eq!(config.quit_addr(), DEFAULT_QUIT_ADDR);
}

#[test]
fn test_endpoint_gets_leading_slash() {
    let config = Config::resolve(
        true,
        vec![
            WaitOption::ReadyPort(15000),
            WaitOption::ReadyEndpoint("ready".into()),
        ],
    )
    .unwrap();

    assert_eq!(config.ready_addr(), Some("http://localhost:15000/ready"));
}

#[test]
fn test_empty_endpoint_rejected() {
    let result = Config::resolve(true, vec![WaitOption::QuitEndpoint("  ".into())]);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidEndpoint { field: "quit", .. })
    ));
}

#[test]
fn test_zero_port_rejected() {
    let result = Config::resolve(true, vec![WaitOption::ReadyPort(0)]);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidPort {
            field: "ready",
            port: 0
        })
    ));
}

#[test]
fn test_null_transport_rejected() {
    let result = Config::resolve(true, vec![WaitOption::Transport(None)]);

    assert!(matches!(result, Err(ConfigError::NullTransport)));
}

/// Options still run when disabled, so a bad option is still an error
#[test]
fn test_null_transport_rejected_when_disabled() {
    let result = Config::resolve(false, vec![WaitOption::Transport(None)]);

    assert!(matches!(result, Err(ConfigError::NullTransport)));
}

/// Resolution stops at the first failing option
#[test]
fn test_first_failure_aborts_resolution() {
    let result = Config::resolve(
        true,
        vec![
            WaitOption::ReadyPort(0),
            WaitOption::Transport(None),
        ],
    );

    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
}

#[test]
fn test_zero_timeout_rejected() {
    let result = Config::resolve(true, vec![WaitOption::Timeout(Duration::ZERO)]);

    assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
}

#[test]
fn test_timeout_and_injected_capabilities_accepted() {
    let transport: Arc<dyn Transport> = Arc::new(MockTransport::new());
    let config = Config::resolve(
        true,
        vec![
            WaitOption::Timeout(Duration::from_secs(1)),
            WaitOption::Transport(Some(transport)),
            WaitOption::Logger(Arc::new(MockLogger::new())),
            WaitOption::Debug,
            WaitOption::Legacy,
        ],
    );

    let config = config.unwrap();
    assert!(config.legacy_fallback);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::NullTransport.to_string(),
        "transport must not be null"
    );
    assert_eq!(
        ConfigError::InvalidPort {
            field: "quit",
            port: 0
        }
        .to_string(),
        "invalid quit port: 0"
    );
}

#[test]
fn test_port_moves_ready_and_quit_together() {
    let config = Config::resolve(true, vec![WaitOption::Port(15000)]).unwrap();

    assert_eq!(config.ready_addr(), Some("http://localhost:15000/ready"));
    assert_eq!(config.quit_addr(), "http://localhost:15000/quitquitquit");
}

/// Later specific options win over the shared port
#[test]
fn test_port_then_quit_port_override() {
    let config = Config::resolve(
        true,
        vec![WaitOption::Port(15000), WaitOption::QuitPort(15020)],
    )
    .unwrap();

    assert_eq!(config.ready_addr(), Some("http://localhost:15000/ready"));
    assert_eq!(config.quit_addr(), "http://localhost:15020/quitquitquit");
}

#[test]
fn test_zero_shared_port_rejected() {
    let result = Config::resolve(true, vec![WaitOption::Port(0)]);

    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
}
