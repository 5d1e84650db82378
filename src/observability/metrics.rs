//! Metrics collection and exposition.
//!
//! # Metrics
//! - `nudge_retry_attempts_total` (counter): retries by category
//! - `nudge_breaker_opened_total` (counter): Closed → Open transitions by breaker
//! - `nudge_breaker_rejections_total` (counter): calls refused while open
//! - `nudge_fallbacks_total` (counter): fallback uses by category and reason
//! - `nudge_runs_total` (counter): run outcomes
//! - `nudge_history_entries` (gauge): ledger size
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder they cost nothing
//! - Exporter is only installed in daemon mode

use std::net::SocketAddr;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::recommendation::{Category, FallbackReason};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_retry(category: Category) {
    metrics::counter!("nudge_retry_attempts_total", "category" => category.as_str()).increment(1);
}

pub fn record_breaker_opened(breaker: &str) {
    metrics::counter!("nudge_breaker_opened_total", "breaker" => breaker.to_string()).increment(1);
}

pub fn record_breaker_rejection(breaker: &str) {
    metrics::counter!("nudge_breaker_rejections_total", "breaker" => breaker.to_string()).increment(1);
}

pub fn record_fallback(category: Category, reason: FallbackReason) {
    metrics::counter!(
        "nudge_fallbacks_total",
        "category" => category.as_str(),
        "reason" => reason.as_str()
    )
    .increment(1);
}

pub fn record_run(outcome: &'static str) {
    metrics::counter!("nudge_runs_total", "outcome" => outcome).increment(1);
}

pub fn record_history_size(entries: usize) {
    metrics::gauge!("nudge_history_entries").set(entries as f64);
}
