//! Retry logic.
//!
//! # Responsibilities
//! - Classify failures as retryable or fatal
//! - Execute retries with exponential backoff + jitter
//! - Report every retry to an observer (logging/telemetry)
//!
//! # Design Decisions
//! - HTTP status is inspected first when present, error kind otherwise
//! - Fatal errors propagate on the first occurrence
//! - Observer failures are logged and never abort the loop

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::schema::RetryConfig;
use crate::provider::error::{FetchError, FetchErrorKind};
use crate::resilience::backoff::calculate_backoff;

/// Status codes worth another attempt: rate limiting plus transient server
/// and edge (520-524) failures.
pub const RETRYABLE_STATUS_CODES: [u16; 10] = [429, 500, 502, 503, 504, 520, 521, 522, 523, 524];

/// Error returned by an observer; logged and discarded.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Decide whether a fetch failure should be retried.
pub fn is_retryable(error: &FetchError) -> bool {
    if let Some(status) = error.status {
        return RETRYABLE_STATUS_CODES.contains(&status);
    }
    matches!(error.kind, FetchErrorKind::Timeout | FetchErrorKind::Connection)
}

/// One failed attempt that is about to be retried.
#[derive(Debug)]
pub struct RetryAttempt<'a, E> {
    /// 1-based number of the attempt that failed.
    pub attempt: u32,
    pub delay: Duration,
    pub cause: &'a E,
}

/// Terminal failure of a retried operation.
#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// Non-retryable failure, surfaced without further attempts.
    #[error("fatal error: {0}")]
    Fatal(#[source] E),

    /// Every attempt failed with a retryable error.
    #[error("failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: E,
    },
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// The underlying error of the final attempt.
    pub fn cause(&self) -> &E {
        match self {
            RetryError::Fatal(e) => e,
            RetryError::Exhausted { last, .. } => last,
        }
    }

    pub fn into_cause(self) -> E {
        match self {
            RetryError::Fatal(e) => e,
            RetryError::Exhausted { last, .. } => last,
        }
    }
}

/// Retry settings for one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter: config.jitter,
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds, fails fatally, or attempts run out.
    ///
    /// `observer` is invoked before each backoff sleep.
    pub async fn execute<T, E, Op, Fut, C, O>(
        &self,
        mut op: Op,
        is_retryable: C,
        mut observer: O,
    ) -> Result<T, RetryError<E>>
    where
        E: std::error::Error + 'static,
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> bool,
        O: FnMut(&RetryAttempt<'_, E>) -> Result<(), ObserverError>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let error = match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !is_retryable(&error) {
                tracing::warn!(attempt = attempt + 1, error = %error, "Non-retryable failure");
                return Err(RetryError::Fatal(error));
            }

            if attempt + 1 == max_attempts {
                tracing::error!(attempts = max_attempts, error = %error, "Retries exhausted");
                return Err(RetryError::Exhausted {
                    attempts: max_attempts,
                    last: error,
                });
            }

            let delay = calculate_backoff(attempt, self.base_delay, self.max_delay, self.jitter);
            tracing::warn!(
                attempt = attempt + 1,
                delay = ?delay,
                error = %error,
                "Attempt failed, retrying"
            );

            let report = RetryAttempt {
                attempt: attempt + 1,
                delay,
                cause: &error,
            };
            if let Err(e) = observer(&report) {
                tracing::warn!(error = %e, "Retry observer failed");
            }

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
