//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Passive checks (passive.rs):
//!     breaker phases, history and schedule stores
//!
//! Active checks (active.rs):
//!     one live probe per configured provider
//!
//! Aggregation (state.rs):
//!     results → overall_status → report
//! ```
//!
//! # Design Decisions
//! - Checks never fail; every problem becomes a result
//! - Probes bypass the breakers

pub mod active;
pub mod passive;
pub mod state;

use std::time::Duration;
use chrono::{DateTime, Utc};

use crate::orchestrator::Orchestrator;

pub use state::{overall_status, HealthCheckResult, HealthStatus};

/// Run every check against the components the orchestrator holds.
///
/// Each provider is called with the same location a run would send it.
pub async fn run_all_checks(orchestrator: &Orchestrator, region: &str, timeout: Duration) -> Vec<HealthCheckResult> {
    let now = Utc::now();
    let mut results = Vec::new();

    for pipeline in orchestrator.pipelines() {
        let location = pipeline.category().location(region);
        results.push(passive::check_breaker(pipeline.breaker(), now));
        results.push(active::probe_fetcher(pipeline.fetcher(), location, timeout).await);
    }
    results.push(passive::check_history(orchestrator.history(), now));
    results.push(passive::check_schedule(orchestrator.scheduler(), now));

    for result in &results {
        tracing::info!(
            service = %result.service,
            status = %result.status,
            message = result.message.as_deref().unwrap_or(""),
            "Health check"
        );
    }
    results
}

/// Plain-text report for the terminal.
pub fn render_report(results: &[HealthCheckResult], now: DateTime<Utc>) -> String {
    let rule = "=".repeat(60);
    let mut out = vec![
        rule.clone(),
        "SYSTEM HEALTH REPORT".to_string(),
        rule.clone(),
        format!("Overall Status: {}", overall_status(results).to_string().to_uppercase()),
        format!("Check Time: {}", now.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        "Service Details:".to_string(),
        "-".repeat(60),
    ];

    for result in results {
        let timing = result
            .response_time
            .map(|t| format!("({:.2}s)", t.as_secs_f64()))
            .unwrap_or_default();
        out.push(format!("{:<24} {:<10} {}", result.service, result.status, timing).trim_end().to_string());
        if let Some(message) = &result.message {
            out.push(format!("   - {message}"));
        }
    }
    out.push(rule);
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use chrono::TimeZone;
    use futures_util::future::BoxFuture;

    use crate::config::NudgeConfig;
    use crate::history::HistoryStore;
    use crate::orchestrator::{CategoryPipeline, RunSettings};
    use crate::provider::{ConsoleNotifier, ContentFetcher, FetchError, RawItem};
    use crate::recommendation::Category;
    use crate::resilience::{CircuitBreaker, RetryPolicy};
    use crate::scheduler::Scheduler;
    use crate::storage::MemoryStore;

    /// Answers every fetch and remembers the location it was given.
    struct LocationLog {
        category: Category,
        seen: Arc<Mutex<Vec<(Category, Option<String>)>>>,
    }

    impl ContentFetcher for LocationLog {
        fn category(&self) -> Category {
            self.category
        }

        fn fetch<'a>(&'a self, location: Option<&'a str>) -> BoxFuture<'a, Result<RawItem, FetchError>> {
            self.seen.lock().unwrap().push((self.category, location.map(str::to_string)));
            Box::pin(async { Ok(RawItem::named("Sample")) })
        }
    }

    #[tokio::test]
    async fn test_health_checks_use_the_run_location_rule() {
        let config = NudgeConfig::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut orchestrator = Orchestrator::new(
            Arc::new(Scheduler::open(&config.schedule, MemoryStore::new())),
            Arc::new(HistoryStore::open(MemoryStore::new())),
            Arc::new(ConsoleNotifier),
            RunSettings::from(&config),
        );
        for category in [Category::Restaurant, Category::Movie] {
            let fetcher = Arc::new(LocationLog { category, seen: seen.clone() });
            let breaker = Arc::new(CircuitBreaker::new(category.as_str(), 3, Duration::from_secs(60)));
            orchestrator = orchestrator.with_pipeline(CategoryPipeline::new(
                fetcher,
                breaker,
                RetryPolicy::default(),
                Duration::from_secs(1),
            ));
        }

        let results = run_all_checks(&orchestrator, "Charleston, SC", Duration::from_secs(1)).await;
        assert_eq!(overall_status(&results), HealthStatus::Healthy);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (Category::Restaurant, Some("Charleston, SC".to_string())),
                (Category::Movie, None),
            ]
        );
    }

    #[test]
    fn test_report_layout() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let results = vec![
            HealthCheckResult::new("history", HealthStatus::Healthy, now).message("ledger readable"),
            HealthCheckResult::new("provider:movie", HealthStatus::Degraded, now)
                .response_time(Duration::from_millis(250)),
        ];

        let report = render_report(&results, now);
        assert!(report.contains("Overall Status: DEGRADED"));
        assert!(report.contains("Check Time: 2024-06-01 12:00:00 UTC"));
        assert!(report.contains("   - ledger readable"));
        assert!(report.contains("(0.25s)"));
    }
}
