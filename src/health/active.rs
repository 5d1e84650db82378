//! Live provider probes.
//!
//! Probes call the fetcher directly with a deadline. They bypass the breaker
//! so a health check neither trips nor resets it.

use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::Utc;

use crate::health::state::{HealthCheckResult, HealthStatus};
use crate::provider::ContentFetcher;
use crate::resilience::with_timeout;

/// Probe one provider. Rate limiting counts as degraded, any other failure as unhealthy.
pub async fn probe_fetcher(
    fetcher: &Arc<dyn ContentFetcher>,
    location: Option<&str>,
    timeout: Duration,
) -> HealthCheckResult {
    let category = fetcher.category();
    let service = format!("provider:{category}");
    let started = Instant::now();

    let result = with_timeout(timeout, fetcher.fetch(location)).await;
    let elapsed = started.elapsed();
    let now = Utc::now();

    let check = match result {
        Ok(item) => HealthCheckResult::new(service, HealthStatus::Healthy, now)
            .message("responding normally")
            .detail("sample", item.name),
        Err(e) if e.status == Some(429) => HealthCheckResult::new(service, HealthStatus::Degraded, now)
            .message("rate limit exceeded")
            .detail("status_code", 429),
        Err(e) => {
            let check = HealthCheckResult::new(service, HealthStatus::Unhealthy, now).message(e.to_string());
            match e.status {
                Some(code) => check.detail("status_code", code),
                None => check,
            }
        }
    };

    tracing::debug!(category = %category, status = %check.status, elapsed = ?elapsed, "Provider probe finished");
    check.response_time(elapsed)
}
