//! Checks derived from state the process already holds.
//!
//! # Responsibilities
//! - Report breaker phases without calling providers
//! - Verify the history and schedule stores are readable

use chrono::{DateTime, Utc};
use std::time::Instant;

use crate::health::state::{HealthCheckResult, HealthStatus};
use crate::history::HistoryStore;
use crate::resilience::{BreakerPhase, CircuitBreaker};
use crate::scheduler::Scheduler;

/// Open → Unhealthy, half-open or recent failures → Degraded.
pub fn check_breaker(breaker: &CircuitBreaker, now: DateTime<Utc>) -> HealthCheckResult {
    let state = breaker.state();
    let phase = breaker.phase();
    let service = format!("breaker:{}", breaker.name());

    let (status, message) = match phase {
        BreakerPhase::Open => (HealthStatus::Unhealthy, "circuit open, live calls are refused".to_string()),
        BreakerPhase::HalfOpen => (HealthStatus::Degraded, "circuit will probe on the next call".to_string()),
        BreakerPhase::Closed if state.consecutive_failures > 0 => (
            HealthStatus::Degraded,
            format!("{} consecutive failures", state.consecutive_failures),
        ),
        BreakerPhase::Closed => (HealthStatus::Healthy, "circuit closed".to_string()),
    };

    HealthCheckResult::new(service, status, now)
        .message(message)
        .detail("phase", phase.to_string())
        .detail("consecutive_failures", state.consecutive_failures)
}

pub fn check_history(history: &HistoryStore, now: DateTime<Utc>) -> HealthCheckResult {
    let started = Instant::now();
    let result = history.check_store();
    let elapsed = started.elapsed();

    match result {
        Ok(exists) => {
            let summary = history.summary(now);
            HealthCheckResult::new("history", HealthStatus::Healthy, now)
                .response_time(elapsed)
                .message(if exists { "ledger readable" } else { "no ledger yet" })
                .detail("location", history.location())
                .detail("total", summary.total)
                .detail("recent_7_days", summary.recent_count_last_7_days)
        }
        Err(e) => HealthCheckResult::new("history", HealthStatus::Unhealthy, now)
            .response_time(elapsed)
            .message(e.to_string())
            .detail("location", history.location()),
    }
}

pub fn check_schedule(scheduler: &Scheduler, now: DateTime<Utc>) -> HealthCheckResult {
    let started = Instant::now();
    let result = scheduler.check_store();
    let elapsed = started.elapsed();

    match result {
        Ok(exists) => HealthCheckResult::new("schedule", HealthStatus::Healthy, now)
            .response_time(elapsed)
            .message(if exists { "schedule readable" } else { "nothing sent yet" })
            .detail("location", scheduler.location()),
        Err(e) => HealthCheckResult::new("schedule", HealthStatus::Unhealthy, now)
            .response_time(elapsed)
            .message(e.to_string())
            .detail("location", scheduler.location()),
    }
}
