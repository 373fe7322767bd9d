//! Retry with exponential backoff for collaborator calls.
//!
//! Only errors whose class is declared retryable are re-attempted;
//! everything else propagates immediately. The LLM call is the sole
//! suspension point in the pipeline, so this is the only place that
//! sleeps.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::llm::LlmError;

/// Errors that can tell the retry loop whether another attempt is worth it.
pub trait RetryClass {
    fn is_retryable(&self) -> bool;
}

impl RetryClass for LlmError {
    fn is_retryable(&self) -> bool {
        LlmError::is_retryable(self)
    }
}

/// Backoff knobs. Defaults: 3 retries, 1 s initial delay, doubled per
/// attempt, capped at 10 s.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Policy that never re-attempts; useful in tests and for callers
    /// that prefer their own fallback over waiting.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

/// Run `op`, re-attempting retryable failures with exponential backoff.
/// Returns the first success, the first non-retryable error, or the last
/// error once attempts are exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: RetryClass + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = policy.initial_delay;

    for attempt in 0..=policy.max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt == policy.max_retries || !err.is_retryable() {
                    return Err(err);
                }
                warn!(attempt = attempt + 1, %err, "retryable failure, backing off");
                tokio::time::sleep(delay.min(policy.max_delay)).await;
                delay *= policy.backoff_multiplier;
            }
        }
    }

    unreachable!("retry loop always returns from its last attempt")
}
