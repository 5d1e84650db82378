//! Guarded live fetch for one category.
//!
//! # Data Flow
//! ```text
//! fetch()
//!     → RetryPolicy::execute          (retries retryable failures)
//!         → CircuitBreaker::call      (fails fast while open)
//!             → with_timeout          (per-call deadline)
//!                 → ContentFetcher::fetch
//!     → DetailEnricher::fetch_details (best-effort, bounded by the same deadline)
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::observability::metrics;
use crate::provider::{ContentFetcher, DetailEnricher, FetchError, RawDetail, RawItem};
use crate::recommendation::{Category, FallbackReason};
use crate::resilience::{is_retryable, with_timeout, BreakerError, CircuitBreaker, RetryAttempt, RetryError, RetryPolicy};

/// A live result, with enrichment when it was available.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveItem {
    pub item: RawItem,
    pub detail: Option<RawDetail>,
}

/// Everything needed to fetch one category live.
pub struct CategoryPipeline {
    category: Category,
    fetcher: Arc<dyn ContentFetcher>,
    enricher: Option<Arc<dyn DetailEnricher>>,
    breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl CategoryPipeline {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        breaker: Arc<CircuitBreaker>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            category: fetcher.category(),
            fetcher,
            enricher: None,
            breaker,
            retry,
            timeout,
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn DetailEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    pub fn fetcher(&self) -> &Arc<dyn ContentFetcher> {
        &self.fetcher
    }

    /// Fetch one live item. A failure names the fallback reason.
    pub async fn fetch(&self, location: Option<&str>) -> Result<LiveItem, FallbackReason> {
        let item = self.fetch_guarded(location).await.map_err(|e| {
            let reason = fallback_reason(&e);
            tracing::warn!(
                category = %self.category,
                reason = reason.as_str(),
                error = %e.cause(),
                "Live fetch failed"
            );
            reason
        })?;

        let detail = self.enrich(&item).await;
        Ok(LiveItem { item, detail })
    }

    async fn fetch_guarded(&self, location: Option<&str>) -> Result<RawItem, RetryError<BreakerError<FetchError>>> {
        let category = self.category;

        self.retry
            .execute(
                || {
                    self.breaker
                        .call(|| with_timeout(self.timeout, self.fetcher.fetch(location)))
                },
                |e: &BreakerError<FetchError>| match e {
                    BreakerError::Open { .. } => false,
                    BreakerError::Inner(inner) => is_retryable(inner),
                },
                |attempt: &RetryAttempt<'_, BreakerError<FetchError>>| {
                    metrics::record_retry(category);
                    tracing::info!(
                        category = %category,
                        attempt = attempt.attempt,
                        delay = ?attempt.delay,
                        error = %attempt.cause,
                        "Retrying provider call"
                    );
                    Ok(())
                },
            )
            .await
    }

    async fn enrich(&self, item: &RawItem) -> Option<RawDetail> {
        let enricher = self.enricher.as_ref()?;
        let id = item.id.as_deref()?;

        match tokio::time::timeout(self.timeout, enricher.fetch_details(id)).await {
            Ok(detail) => detail,
            Err(_) => {
                tracing::warn!(category = %self.category, id, "Detail lookup timed out, using basic item");
                None
            }
        }
    }
}

fn fallback_reason(error: &RetryError<BreakerError<FetchError>>) -> FallbackReason {
    match error {
        RetryError::Fatal(BreakerError::Open { .. }) => FallbackReason::CircuitOpen,
        RetryError::Fatal(BreakerError::Inner(_)) => FallbackReason::Fatal,
        RetryError::Exhausted { .. } => FallbackReason::RetryExhausted,
    }
}
