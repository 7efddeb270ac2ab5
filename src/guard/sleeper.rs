//! Pause abstraction for testable polling
//!
//! Production code uses `TokioSleeper` which delegates to `tokio::time::sleep`.
//! Tests use `MockSleeper` to count pauses without waiting.

use async_trait::async_trait;
use std::time::Duration;

/// Trait for pausing between probe rounds
///
/// Injected via `Config` to allow tests to observe the polling schedule.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper that delegates to `tokio::time::sleep`
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Mock sleeper for testing: returns immediately and records each pause
///
/// Optionally fires a `Canceller` once a given number of pauses has been
/// taken, so tests can stop a poll that would otherwise never finish.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub struct MockSleeper {
    pauses: std::sync::Mutex<Vec<Duration>>,
    cancel_after: Option<(usize, crate::lifecycle::Canceller)>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockSleeper {
    pub fn new() -> Self {
        Self {
            pauses: std::sync::Mutex::new(Vec::new()),
            cancel_after: None,
        }
    }

    pub fn cancel_after(pauses: usize, canceller: crate::lifecycle::Canceller) -> Self {
        Self {
            pauses: std::sync::Mutex::new(Vec::new()),
            cancel_after: Some((pauses, canceller)),
        }
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().expect("MockSleeper lock poisoned").clone()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
#[async_trait]
impl Sleeper for MockSleeper {
    async fn sleep(&self, duration: Duration) {
        let taken = {
            let mut pauses = self.pauses.lock().expect("MockSleeper lock poisoned");
            pauses.push(duration);
            pauses.len()
        };
        if let Some((limit, canceller)) = &self.cancel_after {
            if taken >= *limit {
                canceller.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_advances_time() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(1)).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_mock_sleeper_records_pauses() {
        let sleeper = MockSleeper::new();
        sleeper.sleep(Duration::from_secs(1)).await;
        sleeper.sleep(Duration::from_secs(1)).await;
        assert_eq!(sleeper.pauses(), vec![Duration::from_secs(1); 2]);
    }

    #[tokio::test]
    async fn test_mock_sleeper_cancels_after_limit() {
        let (canceller, signal) = crate::lifecycle::cancel_channel();
        let sleeper = MockSleeper::cancel_after(2, canceller);

        sleeper.sleep(Duration::from_secs(1)).await;
        assert!(!signal.is_cancelled());

        sleeper.sleep(Duration::from_secs(1)).await;
        assert!(signal.is_cancelled());
    }
}
