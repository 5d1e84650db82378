//! Circuit breaker for provider protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: provider assumed down, calls fail fast
//! - Half-Open: implicit; the first call after the recovery timeout
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive_failures >= threshold
//! Open → Closed: first call after recovery timeout (counter reset before the probe)
//! Closed → Open: probe fails and the counter reaches the threshold again
//! ```
//!
//! # Design Decisions
//! - One breaker per call site, shared for the process lifetime
//! - Fail fast in Open state (wrapped operation is never invoked)
//! - Lock is never held across the wrapped call

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::schema::BreakerConfig;
use crate::observability::metrics;

/// Failure of a guarded call.
#[derive(Debug, Error)]
pub enum BreakerError<E: std::error::Error + 'static> {
    /// Rejected without calling the operation.
    #[error("circuit breaker '{name}' is open, retry in {retry_in:?}")]
    Open { name: String, retry_in: Duration },

    /// The operation ran and failed.
    #[error(transparent)]
    Inner(E),
}

impl<E: std::error::Error + 'static> BreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open { .. })
    }
}

/// Mutable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircuitState {
    pub consecutive_failures: u32,
    pub last_failure_time: Option<Instant>,
    pub is_open: bool,
}

/// Externally visible breaker phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerPhase {
    Closed,
    Open,
    /// Open, but the next call will probe.
    HalfOpen,
}

impl std::fmt::Display for BreakerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BreakerPhase::Closed => "closed",
            BreakerPhase::Open => "open",
            BreakerPhase::HalfOpen => "half-open",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    recovery_timeout: Duration,
    state: Mutex<CircuitState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
            state: Mutex::new(CircuitState::default()),
        }
    }

    pub fn from_config(name: impl Into<String>, config: &BreakerConfig) -> Self {
        Self::new(
            name,
            config.failure_threshold,
            Duration::from_secs(config.recovery_timeout_secs),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CircuitState {
        *self.lock()
    }

    pub fn phase(&self) -> BreakerPhase {
        let state = self.lock();
        if !state.is_open {
            return BreakerPhase::Closed;
        }
        match state.last_failure_time {
            Some(t) if t.elapsed() >= self.recovery_timeout => BreakerPhase::HalfOpen,
            _ => BreakerPhase::Open,
        }
    }

    /// Run `op` unless the circuit is open.
    pub async fn call<T, E, Op, Fut>(&self, op: Op) -> Result<T, BreakerError<E>>
    where
        E: std::error::Error + 'static,
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Err(retry_in) = self.admit() {
            return Err(BreakerError::Open {
                name: self.name.clone(),
                retry_in,
            });
        }

        match op().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(BreakerError::Inner(e))
            }
        }
    }

    /// Reject while open; reset optimistically once the timeout has elapsed.
    ///
    /// A rejection carries the time left until the next probe.
    fn admit(&self) -> Result<(), Duration> {
        let mut state = self.lock();
        if !state.is_open {
            return Ok(());
        }

        let elapsed = state
            .last_failure_time
            .map(|t| t.elapsed())
            .unwrap_or(self.recovery_timeout);

        if elapsed >= self.recovery_timeout {
            tracing::info!(breaker = %self.name, "Circuit breaker attempting recovery");
            state.is_open = false;
            state.consecutive_failures = 0;
            return Ok(());
        }

        metrics::record_breaker_rejection(&self.name);
        Err(self.recovery_timeout - elapsed)
    }

    fn record_success(&self) {
        let mut state = self.lock();
        if state.consecutive_failures > 0 {
            tracing::info!(
                breaker = %self.name,
                failures = state.consecutive_failures,
                "Circuit breaker recovered"
            );
        }
        state.consecutive_failures = 0;
    }

    fn record_failure(&self) {
        let mut state = self.lock();
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        state.last_failure_time = Some(Instant::now());

        if !state.is_open && state.consecutive_failures >= self.failure_threshold {
            state.is_open = true;
            metrics::record_breaker_opened(&self.name);
            tracing::error!(
                breaker = %self.name,
                failures = state.consecutive_failures,
                recovery_timeout = ?self.recovery_timeout,
                "Circuit breaker opened"
            );
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CircuitState> {
        // State is plain data; a poisoned lock still holds a usable value.
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}
