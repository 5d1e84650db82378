//! Component wiring.
//!
//! # Responsibilities
//! - Build stores, breakers, providers and the notifier from configuration
//! - Hand them to the orchestrator explicitly
//!
//! # Design Decisions
//! - One breaker per category, living as long as the orchestrator
//! - Categories without an endpoint get no pipeline and are served from the fallback catalog

use std::sync::Arc;
use std::time::Duration;

use crate::config::NudgeConfig;
use crate::history::HistoryStore;
use crate::orchestrator::{CategoryPipeline, Orchestrator, RunSettings};
use crate::provider::{ConsoleNotifier, HttpFetcher, Notifier, WebhookNotifier};
use crate::recommendation::Category;
use crate::resilience::{CircuitBreaker, RetryPolicy};
use crate::scheduler::Scheduler;
use crate::storage::JsonFileStore;

/// Build a ready-to-run orchestrator backed by JSON files under `storage.data_dir`.
pub fn build_orchestrator(config: &NudgeConfig) -> Orchestrator {
    let history = Arc::new(HistoryStore::open(JsonFileStore::new(config.storage.history_path())));
    let scheduler = Arc::new(Scheduler::open(
        &config.schedule,
        JsonFileStore::new(config.storage.schedule_path()),
    ));

    let notifier: Arc<dyn Notifier> = match &config.notify.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(ConsoleNotifier),
    };

    let mut orchestrator = Orchestrator::new(scheduler, history, notifier, RunSettings::from(config));

    let timeout = Duration::from_secs(config.fetch.timeout_secs);
    for category in Category::ALL {
        let Some(url) = config.fetch.url_for(category) else {
            tracing::info!(category = %category, "No provider configured, using backup recommendations");
            continue;
        };

        let fetcher = Arc::new(HttpFetcher::new(category, url));
        let breaker = Arc::new(CircuitBreaker::from_config(category.as_str(), &config.breaker));
        let retry = RetryPolicy::from(config.retry_for(category));

        tracing::info!(
            category = %category,
            url = %url,
            max_attempts = retry.max_attempts,
            "Provider configured"
        );
        orchestrator = orchestrator.with_pipeline(
            CategoryPipeline::new(fetcher.clone(), breaker, retry, timeout).with_enricher(fetcher),
        );
    }

    orchestrator
}
