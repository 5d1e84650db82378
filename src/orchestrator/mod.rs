//! One recommendation run, end to end.
//!
//! # Data Flow
//! ```text
//! run_once(force)
//!     → Scheduler::should_send        (skipped unless forced)
//!     → pick category                  (least sent in the last 30 days)
//!     → CategoryPipeline::fetch        (retry + breaker + timeout, duplicates refetched)
//!         ↳ FallbackProvider           (any live failure)
//!     → Notifier::send                 (failure leaves state untouched)
//!     → HistoryStore::add → Scheduler::mark_sent → prune
//! ```
//!
//! # Design Decisions
//! - Every component is constructed by the entry point and handed in; nothing is global
//! - Provider failures never escape a run; only persistence failures do
//! - State is recorded only after a successful delivery

pub mod fetch;
pub mod format;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::Instrument;

use crate::config::NudgeConfig;
use crate::fallback::FallbackProvider;
use crate::history::HistoryStore;
use crate::observability::metrics;
use crate::observability::tracing::{new_run_id, run_span};
use crate::provider::Notifier;
use crate::recommendation::{Category, FallbackReason, Recommendation, RunContext, Source};
use crate::scheduler::Scheduler;
use crate::storage::StoreError;

pub use fetch::{CategoryPipeline, LiveItem};

/// Window used to balance categories.
const ROTATION_WINDOW_DAYS: i64 = 30;

/// Failure that aborts a run after delivery.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to record history: {0}")]
    History(#[source] StoreError),

    #[error("failed to record schedule: {0}")]
    Schedule(#[source] StoreError),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Skipped { reason: String },
    Sent { category: Category, name: String, source: Source },
    NotifyFailed { message: String },
}

impl RunOutcome {
    /// Label used for the runs metric.
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Skipped { .. } => "skipped",
            RunOutcome::Sent { source: Source::Live, .. } => "sent_live",
            RunOutcome::Sent { .. } => "sent_fallback",
            RunOutcome::NotifyFailed { .. } => "notify_failed",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Skipped { reason } => write!(f, "Skipped: {reason}"),
            RunOutcome::Sent { category, name, source: Source::Live } => {
                write!(f, "Sent {category} recommendation: {name}")
            }
            RunOutcome::Sent { category, name, source: Source::Fallback { reason } } => {
                write!(f, "Sent backup {category} recommendation: {name} ({})", reason.as_str())
            }
            RunOutcome::NotifyFailed { message } => write!(f, "Delivery failed: {message}"),
        }
    }
}

/// Run-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub region: String,
    pub max_duplicate_retries: u32,
    pub prune_after_days: u32,
}

impl From<&NudgeConfig> for RunSettings {
    fn from(config: &NudgeConfig) -> Self {
        Self {
            region: config.fetch.region.clone(),
            max_duplicate_retries: config.fetch.max_duplicate_retries,
            prune_after_days: config.storage.prune_after_days,
        }
    }
}

pub struct Orchestrator {
    scheduler: Arc<Scheduler>,
    history: Arc<HistoryStore>,
    fallback: FallbackProvider,
    pipelines: BTreeMap<Category, CategoryPipeline>,
    notifier: Arc<dyn Notifier>,
    settings: RunSettings,
}

impl Orchestrator {
    pub fn new(
        scheduler: Arc<Scheduler>,
        history: Arc<HistoryStore>,
        notifier: Arc<dyn Notifier>,
        settings: RunSettings,
    ) -> Self {
        Self {
            scheduler,
            history,
            fallback: FallbackProvider::new(),
            pipelines: BTreeMap::new(),
            notifier,
            settings,
        }
    }

    /// Register the live pipeline for its category, replacing any previous one.
    pub fn with_pipeline(mut self, pipeline: CategoryPipeline) -> Self {
        self.pipelines.insert(pipeline.category(), pipeline);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackProvider) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn pipelines(&self) -> impl Iterator<Item = &CategoryPipeline> {
        self.pipelines.values()
    }

    /// Run one cycle at the current local time.
    pub async fn run_once(&self, force: bool) -> Result<RunOutcome, RunError> {
        self.run_at(Local::now(), force).await
    }

    /// Run one cycle as if it were `now`. Quiet hours use the wall clock of `now`'s zone.
    pub async fn run_at<Tz>(&self, now: DateTime<Tz>, force: bool) -> Result<RunOutcome, RunError>
    where
        Tz: TimeZone,
    {
        let run_id = new_run_id();
        let result = self.run_cycle(now, force).instrument(run_span(&run_id, force)).await;

        match &result {
            Ok(outcome) => {
                metrics::record_run(outcome.label());
                tracing::info!(run_id = %run_id, outcome = %outcome, "Run finished");
            }
            Err(e) => {
                metrics::record_run("error");
                tracing::error!(run_id = %run_id, error = %e, "Run failed");
            }
        }
        result
    }

    async fn run_cycle<Tz>(&self, now: DateTime<Tz>, force: bool) -> Result<RunOutcome, RunError>
    where
        Tz: TimeZone,
    {
        if !force {
            let decision = self.scheduler.should_send(&now);
            if !decision.should_send() {
                return Ok(RunOutcome::Skipped { reason: decision.to_string() });
            }
        }

        let utc_now = now.with_timezone(&Utc);
        let ctx = RunContext::at(&now);
        let category = self.pick_category(utc_now);
        tracing::info!(category = %category, season = %ctx.season, time_of_day = %ctx.time_of_day, "Selected category");

        let recommendation = self.recommend(category, &ctx).await;

        let subject = format::subject(recommendation.category, &recommendation.name);
        match self.notifier.send(&subject, &recommendation.text).await {
            Ok(message) => tracing::info!(message = %message, "Recommendation delivered"),
            Err(e) => {
                tracing::error!(error = %e, "Recommendation delivery failed");
                return Ok(RunOutcome::NotifyFailed { message: e.to_string() });
            }
        }

        let added = self
            .history
            .add(recommendation.category, &recommendation.name, &recommendation.text, utc_now)
            .map_err(RunError::History)?;
        if !added {
            tracing::info!(name = %recommendation.name, "Sent recommendation was already in history");
        }

        self.scheduler.mark_sent(utc_now).map_err(RunError::Schedule)?;

        if let Err(e) = self.history.prune_older_than(self.settings.prune_after_days, utc_now) {
            tracing::warn!(error = %e, "History prune failed");
        }

        Ok(RunOutcome::Sent {
            category: recommendation.category,
            name: recommendation.name,
            source: recommendation.source,
        })
    }

    /// The category sent least in the rotation window; ties go to the earlier category.
    pub fn pick_category(&self, now: DateTime<Utc>) -> Category {
        let recent = self.history.recent(Duration::days(ROTATION_WINDOW_DAYS), now);
        Category::ALL
            .into_iter()
            .min_by_key(|c| recent.iter().filter(|e| e.category == *c).count())
            .unwrap_or(Category::Restaurant)
    }

    /// Always produces a recommendation: live when possible, curated otherwise.
    async fn recommend(&self, category: Category, ctx: &RunContext) -> Recommendation {
        let Some(pipeline) = self.pipelines.get(&category) else {
            return self.fallback_for(category, ctx, FallbackReason::Unconfigured);
        };

        let location = category.location(&self.settings.region);

        for attempt in 0..=self.settings.max_duplicate_retries {
            let live = match pipeline.fetch(location).await {
                Ok(live) => live,
                Err(reason) => return self.fallback_for(category, ctx, reason),
            };

            if self.history.contains(category, &live.item.name) {
                tracing::info!(
                    category = %category,
                    name = %live.item.name,
                    attempt = attempt + 1,
                    "Live result was sent before, fetching another"
                );
                continue;
            }

            return Recommendation {
                category,
                name: live.item.name.trim().to_string(),
                text: format::render_live(category, &live.item, live.detail.as_ref(), ctx),
                source: Source::Live,
            };
        }

        self.fallback_for(category, ctx, FallbackReason::Duplicate)
    }

    fn fallback_for(&self, category: Category, ctx: &RunContext, reason: FallbackReason) -> Recommendation {
        self.fallback
            .pick_avoiding(category, ctx, reason, |name| self.history.contains(category, name))
    }
}
