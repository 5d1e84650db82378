//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Provider call:
//!     → retries.rs (classify failure, retry with backoff)
//!     → circuit_breaker.rs (track failures, fail fast while open)
//!     → timeouts.rs (enforce per-call deadline)
//!     → live provider
//! ```
//!
//! # Design Decisions
//! - Composition is explicit at the call site, outermost first:
//!   `retry.execute(|| breaker.call(|| with_timeout(limit, fetch())))`
//! - Breaker rejections are never retried
//! - Exhausted or rejected calls are answered by the fallback catalog

pub mod backoff;
pub mod circuit_breaker;
pub mod retries;
pub mod timeouts;

pub use backoff::{calculate_backoff, compute_delay};
pub use circuit_breaker::{BreakerError, BreakerPhase, CircuitBreaker, CircuitState};
pub use retries::{is_retryable, RetryAttempt, RetryError, RetryPolicy};
pub use timeouts::with_timeout;
