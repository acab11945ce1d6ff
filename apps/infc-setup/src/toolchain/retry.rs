//! Fixed-delay retry for fallible async operations.
//!
//! Downloads and extractions fail for reasons that often clear up on their
//! own (a dropped connection, a file still held by a scanner). [`retry`]
//! re-runs such an operation a bounded number of times with a constant pause
//! in between. There is no exponential backoff.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::errors::SetupError;

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// How often and how patiently an operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on invocations of the operation. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given bounds.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// Runs `operation` until it succeeds or `policy.max_attempts` is reached.
///
/// `label` names the operation in log output.
///
/// # Errors
///
/// Returns [`SetupError::RetriesExhausted`] carrying the attempt count and the
/// message of the last failure once every attempt has failed.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.attempts();
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{label} succeeded on attempt {attempt}/{max_attempts}");
                }
                return Ok(value);
            }
            Err(e) => {
                warn!("{label} failed (attempt {attempt}/{max_attempts}): {e:#}");
                last_error = Some(e);
                if attempt < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    let message = last_error.map_or_else(
        || "no attempt was made".to_string(),
        |e| format!("{e:#}"),
    );
    Err(SetupError::RetriesExhausted {
        attempts: max_attempts,
        message,
    }
    .into())
}
