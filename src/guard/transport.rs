//! HTTP transport used for readiness probes and the quit signal
//!
//! Follows the same trait-based pattern as the logger and sleeper seams:
//! - `Transport` trait for abstraction
//! - `HttpTransport` for production (reqwest)
//! - `MockTransport` for testing

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Unreachable(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Minimal HTTP capability needed to talk to a sidecar
///
/// Implementations report the response status only; bodies are ignored.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<StatusCode, TransportError>;

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<StatusCode, TransportError>;
}

/// Production transport backed by a `reqwest::Client`
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: None,
        }
    }
}

impl HttpTransport {
    /// Transport with no client-level timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every request is bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self {
            client,
            timeout: Some(timeout),
        })
    }

    fn classify(&self, e: reqwest::Error) -> TransportError {
        match self.timeout {
            Some(timeout) if e.is_timeout() => TransportError::Timeout(timeout),
            _ => TransportError::Unreachable(e.to_string()),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<StatusCode, TransportError> {
        let response = self.client.get(url).send().await.map_err(|e| self.classify(e))?;
        Ok(response.status())
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<StatusCode, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        Ok(response.status())
    }
}

/// A request seen by `MockTransport`
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Get(String),
    Post {
        url: String,
        content_type: String,
        body: Vec<u8>,
    },
}

/// Mock transport for testing with scripted per-address responses
///
/// Each address has a queue of responses; once the queue is drained the
/// address keeps returning its last response. Unscripted addresses fail
/// with `Unreachable`.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub struct MockTransport {
    responses: std::sync::Mutex<
        std::collections::HashMap<
            String,
            std::collections::VecDeque<Result<StatusCode, TransportError>>,
        >,
    >,
    post_response: Result<StatusCode, TransportError>,
    calls: std::sync::Mutex<Vec<MockCall>>,
}

#[cfg(test)]
impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::HashMap::new()),
            post_response: Ok(StatusCode::OK),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue GET responses for `url`, returned in order
    pub fn on_get(self, url: &str, responses: Vec<Result<StatusCode, TransportError>>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), responses.into_iter().collect());
        self
    }

    /// Response returned for every POST
    pub fn on_post(mut self, response: Result<StatusCode, TransportError>) -> Self {
        self.post_response = response;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Get(url) => Some(url),
                MockCall::Post { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<StatusCode, TransportError> {
        self.calls.lock().unwrap().push(MockCall::Get(url.to_string()));

        let mut responses = self.responses.lock().unwrap();
        let response = match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Unreachable("no response".into()))),
            None => Err(TransportError::Unreachable(format!(
                "connection refused: {}",
                url
            ))),
        };
        response
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<StatusCode, TransportError> {
        self.calls.lock().unwrap().push(MockCall::Post {
            url: url.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        self.post_response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_drains_queue_then_repeats_last() {
        let transport = MockTransport::new().on_get(
            "http://localhost:1/ready",
            vec![Ok(StatusCode::SERVICE_UNAVAILABLE), Ok(StatusCode::OK)],
        );

        let first = transport.get("http://localhost:1/ready").await;
        let second = transport.get("http://localhost:1/ready").await;
        let third = transport.get("http://localhost:1/ready").await;

        assert_eq!(first.ok(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(second.ok(), Some(StatusCode::OK));
        assert_eq!(third.ok(), Some(StatusCode::OK));
        assert_eq!(transport.gets().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_transport_unscripted_address_is_unreachable() {
        let transport = MockTransport::new();
        let result = transport.get("http://localhost:2/ready").await;
        assert!(matches!(result, Err(TransportError::Unreachable(_))));
    }

    #[test]
    fn test_http_transport_with_timeout_builds() {
        let transport = HttpTransport::with_timeout(Duration::from_millis(250));
        assert!(transport.is_ok());
    }

    #[test]
    fn test_timeout_error_message_includes_duration() {
        let err = TransportError::Timeout(Duration::from_secs(2));
        assert_eq!(err.to_string(), "request timed out after 2s");
    }
}
