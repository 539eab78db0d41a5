//! Bounded retry with exponential backoff for Stripe calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::ports::PlatformError;

/// Retry policy for outbound platform calls.
///
/// Only errors flagged `retryable` are retried. The whole sequence of attempts
/// (including backoff sleeps) is bounded by `deadline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,

    /// Upper bound for a single backoff delay.
    pub max_delay: Duration,

    /// Upper bound for all attempts together.
    pub deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::for_request_timeout(Duration::from_secs(10), 2)
    }
}

impl RetryPolicy {
    /// Derive a deadline that leaves room for every attempt and its backoff.
    pub fn for_request_timeout(request_timeout: Duration, max_retries: u32) -> Self {
        let base_delay = Duration::from_millis(250);
        let max_delay = Duration::from_secs(4);
        let deadline = request_timeout * (max_retries + 1) + max_delay * max_retries;

        Self {
            max_retries,
            base_delay,
            max_delay,
            deadline,
        }
    }

    /// No retries at all.
    pub fn none(deadline: Duration) -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            deadline,
        }
    }

    /// Backoff before retry number `attempt + 1`: 250ms, 500ms, 1s, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, runs
    /// out of retries, or the deadline passes.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, PlatformError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PlatformError>>,
    {
        let attempts = async {
            let mut attempt = 0;
            loop {
                match call().await {
                    Ok(value) => return Ok(value),
                    Err(err) if !err.retryable || attempt >= self.max_retries => return Err(err),
                    Err(err) => {
                        let delay = self.delay_for(attempt);
                        tracing::warn!(
                            operation,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "Stripe call failed, retrying"
                        );
                        sleep(delay).await;
                        attempt += 1;
                    }
                }
            }
        };

        match timeout(self.deadline, attempts).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    operation,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Stripe call exceeded deadline"
                );
                Err(PlatformError::timeout(format!(
                    "{} did not complete within {:?}",
                    operation, self.deadline
                )))
            }
        }
    }
}
