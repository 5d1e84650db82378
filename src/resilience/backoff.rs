//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Fraction of the capped delay used as the jitter band (±25%).
const JITTER_FRACTION: f64 = 0.25;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Calculate the delay before retry number `attempt` (0-based).
///
/// `delay = min(base * 2^attempt, max)`, optionally perturbed by a uniform
/// ±25% jitter drawn from `rng`, never negative.
pub fn compute_delay<R: Rng + ?Sized>(
    attempt: u32,
    base: Duration,
    max: Duration,
    jitter: bool,
    rng: &mut R,
) -> Duration {
    let capped = exponential(attempt, base, max);

    if !jitter || capped.is_zero() {
        return capped;
    }

    let secs = capped.as_secs_f64();
    let spread = secs * JITTER_FRACTION;
    let perturbed = secs + rng.gen_range(-spread..=spread);

    Duration::from_secs_f64(perturbed.max(0.0))
}

/// `min(base * 2^attempt, max)` without jitter, exact for every `attempt`.
fn exponential(attempt: u32, base: Duration, max: Duration) -> Duration {
    if base.is_zero() {
        return Duration::ZERO;
    }
    let nanos = match 1u128.checked_shl(attempt) {
        Some(factor) => base.as_nanos().saturating_mul(factor),
        None => u128::MAX,
    };
    if nanos >= max.as_nanos() {
        return max;
    }
    // Below `max`, so the whole seconds fit in a u64.
    Duration::new((nanos / NANOS_PER_SEC) as u64, (nanos % NANOS_PER_SEC) as u32)
}

/// Same as [`compute_delay`] using the thread-local RNG.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration, jitter: bool) -> Duration {
    compute_delay(attempt, base, max, jitter, &mut rand::thread_rng())
}
