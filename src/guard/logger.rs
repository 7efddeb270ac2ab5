//! Diagnostic sink for probe and quit messages
//!
//! Defaults to `Discard`. `TracingLogger` forwards into `tracing`, and any
//! `Fn(&str)` closure can be injected directly.

/// Receives one diagnostic line per event
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

/// Drops every message
pub struct Discard;

impl Logger for Discard {
    fn log(&self, _message: &str) {}
}

/// Forwards messages to `tracing` at debug level
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::debug!(target: "sidecar_guard", "{}", message);
    }
}

impl<F> Logger for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Mock logger for testing - stores messages in memory
#[cfg(test)]
#[derive(Default)]
pub struct MockLogger {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl MockLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl Logger for MockLogger {
    fn log(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_is_a_logger() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let logger = move |msg: &str| sink.lock().unwrap().push(msg.to_string());

        logger.log("GET http://localhost:15020/ready - 503 Service Unavailable");

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_discard_accepts_messages() {
        let logger: Arc<dyn Logger> = Arc::new(Discard);
        logger.log("ignored");
    }
}
