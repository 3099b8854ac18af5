//! # Timeout and Retry
//!
//! Bounded retry with exponential backoff, and per-attempt timeouts, for
//! calls into external workers.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::execution;

/// Retry policy for a fallible async operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first call
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: execution::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(execution::DEFAULT_INITIAL_DELAY_MS),
            backoff_multiplier: execution::DEFAULT_BACKOFF_MULTIPLIER,
            max_delay: Duration::from_millis(execution::DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after `failed_attempt` (1-based) before the next one
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1).min(30) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}

/// Failures produced by the retry helpers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetryError {
    #[error("{context}: timed out after {}ms", .timeout.as_millis())]
    Timeout { context: String, timeout: Duration },

    #[error("{context}: failed after {attempts} attempts: {last_error}")]
    Exhausted {
        context: String,
        attempts: u32,
        last_error: String,
    },
}

/// Run `operation` until it succeeds or the policy's attempts are used up
pub async fn execute_with_retry<F, Fut, T, E>(
    operation: F,
    policy: &RetryPolicy,
    context: &str,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_loop(operation, policy, context)
        .await
        .map_err(|(attempts, error)| RetryError::Exhausted {
            context: context.to_string(),
            attempts,
            last_error: error.to_string(),
        })
}

/// Shared backoff loop; yields the attempt count and the last error on failure
async fn retry_loop<F, Fut, T, E>(
    mut operation: F,
    policy: &RetryPolicy,
    context: &str,
) -> Result<T, (u32, E)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(context = %context, attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    context = %context,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err((attempt, error)),
        }
    }
}

/// Bound `future` by `timeout`
pub async fn execute_with_timeout<Fut, T>(
    future: Fut,
    timeout: Duration,
    context: &str,
) -> Result<T, RetryError>
where
    Fut: Future<Output = T>,
{
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| RetryError::Timeout {
            context: context.to_string(),
            timeout,
        })
}

/// Why a single bounded attempt failed
enum AttemptFailure<E> {
    Failed(E),
    TimedOut(RetryError),
}

impl<E: Display> Display for AttemptFailure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(error) => error.fmt(f),
            Self::TimedOut(error) => error.fmt(f),
        }
    }
}

/// Retry `operation` with each attempt bounded by `timeout`.
/// A timed-out attempt counts as a failed attempt; when the last attempt
/// timed out the result is [`RetryError::Timeout`], otherwise
/// [`RetryError::Exhausted`].
pub async fn execute_with_timeout_and_retry<F, Fut, T, E>(
    mut operation: F,
    timeout: Duration,
    policy: &RetryPolicy,
    context: &str,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_loop(
        || {
            let attempt = operation();
            async move {
                match execute_with_timeout(attempt, timeout, context).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(error)) => Err(AttemptFailure::Failed(error)),
                    Err(elapsed) => Err(AttemptFailure::TimedOut(elapsed)),
                }
            }
        },
        policy,
        context,
    )
    .await
    .map_err(|(attempts, failure)| match failure {
        AttemptFailure::TimedOut(elapsed) => elapsed,
        AttemptFailure::Failed(error) => RetryError::Exhausted {
            context: context.to_string(),
            attempts,
            last_error: error.to_string(),
        },
    })
}
