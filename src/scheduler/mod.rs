//! Quiet-hours and cadence gate.
//!
//! # Responsibilities
//! - Decide whether a send is permitted right now
//! - Record completed sends durably
//! - Report the schedule for the `status` command
//!
//! # Design Decisions
//! - Cadence is checked first; a not-due result short-circuits the quiet-hours check
//! - Quiet hours use the wall-clock hour of the caller's time zone, cadence uses UTC instants
//! - The policy is swapped atomically on config reload; persisted state is untouched

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::Serialize;

use crate::config::schema::ScheduleConfig;
use crate::storage::{load_or_default, StateStore, StoreError};

pub mod quiet_hours;
pub mod state;

pub use quiet_hours::{is_quiet_hour, is_quiet_hours};
pub use state::ScheduleState;

/// Timing rules currently in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub quiet_hours_start: u32,
    pub quiet_hours_end: u32,
    pub cadence: Duration,
}

impl From<&ScheduleConfig> for SchedulePolicy {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            quiet_hours_start: config.quiet_hours_start,
            quiet_hours_end: config.quiet_hours_end,
            cadence: Duration::days(i64::from(config.cadence_days)),
        }
    }
}

impl SchedulePolicy {
    fn quiet_range(&self) -> String {
        format!("{:02}:00-{:02}:00", self.quiet_hours_start, self.quiet_hours_end)
    }
}

/// Outcome of the send gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendDecision {
    Ready,
    NotDue {
        last_sent_at: DateTime<Utc>,
        days_remaining: i64,
    },
    QuietHours {
        range: String,
        hour: u32,
        minute: u32,
    },
}

impl SendDecision {
    pub fn should_send(&self) -> bool {
        matches!(self, SendDecision::Ready)
    }
}

impl fmt::Display for SendDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendDecision::Ready => write!(f, "Ready to send recommendation"),
            SendDecision::NotDue { last_sent_at, days_remaining } => write!(
                f,
                "Not due yet. Last sent: {}. Next due in {} days.",
                last_sent_at.format("%Y-%m-%d %H:%M UTC"),
                days_remaining
            ),
            SendDecision::QuietHours { range, hour, minute } => write!(
                f,
                "In quiet hours ({}). Current time: {:02}:{:02}",
                range, hour, minute
            ),
        }
    }
}

/// Snapshot for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub is_quiet_hours: bool,
    pub quiet_hours_range: String,
    pub is_due: bool,
    pub should_send: bool,
    pub reason: String,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub next_due_at: Option<DateTime<Utc>>,
    pub cadence_days: i64,
}

pub struct Scheduler {
    policy: ArcSwap<SchedulePolicy>,
    state: Mutex<ScheduleState>,
    store: Box<dyn StateStore<ScheduleState>>,
}

impl Scheduler {
    /// Open the scheduler; a missing or corrupt store means nothing was sent yet.
    pub fn open(config: &ScheduleConfig, store: impl StateStore<ScheduleState> + 'static) -> Self {
        let state: ScheduleState = load_or_default(&store);
        tracing::info!(
            last_sent_at = ?state.last_sent_at,
            store = %store.describe(),
            "Schedule loaded"
        );

        Self {
            policy: ArcSwap::from_pointee(SchedulePolicy::from(config)),
            state: Mutex::new(state),
            store: Box::new(store),
        }
    }

    pub fn policy(&self) -> SchedulePolicy {
        **self.policy.load()
    }

    /// Swap in new timing rules.
    pub fn update_policy(&self, config: &ScheduleConfig) {
        let next = SchedulePolicy::from(config);
        if next != self.policy() {
            tracing::info!(
                quiet_hours = %next.quiet_range(),
                cadence_days = next.cadence.num_days(),
                "Schedule policy updated"
            );
            self.policy.store(Arc::new(next));
        }
    }

    pub fn state(&self) -> ScheduleState {
        *self.lock()
    }

    pub fn is_quiet_hours<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        let policy = self.policy();
        is_quiet_hours(at, policy.quiet_hours_start, policy.quiet_hours_end)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.lock().is_due(now, self.policy().cadence)
    }

    /// Gate a send at `now`; both cadence and quiet hours must allow it.
    pub fn should_send<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> SendDecision {
        let policy = self.policy();
        let utc_now = now.with_timezone(&Utc);
        let state = self.state();

        if let Some(last_sent_at) = state.last_sent_at {
            if !state.is_due(utc_now, policy.cadence) {
                let days_remaining = match last_sent_at.checked_add_signed(policy.cadence) {
                    Some(next_due) => (next_due - utc_now).num_days().max(0),
                    None => policy.cadence.num_days(),
                };
                return SendDecision::NotDue { last_sent_at, days_remaining };
            }
        }

        if is_quiet_hours(now, policy.quiet_hours_start, policy.quiet_hours_end) {
            return SendDecision::QuietHours {
                range: policy.quiet_range(),
                hour: now.hour(),
                minute: now.minute(),
            };
        }

        SendDecision::Ready
    }

    /// Record a completed send. On a persistence failure the previous state is kept.
    pub fn mark_sent(&self, now: DateTime<Utc>) -> Result<(), StoreError> {
        let next = ScheduleState::sent_at(now, self.policy().cadence);
        let mut state = self.lock();

        self.store.save(&next)?;
        *state = next;

        tracing::info!(next_due_at = ?next.next_due_at, "Recommendation marked as sent");
        Ok(())
    }

    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ScheduleSummary {
        let policy = self.policy();
        let state = self.state();
        let decision = self.should_send(now);

        ScheduleSummary {
            is_quiet_hours: is_quiet_hours(now, policy.quiet_hours_start, policy.quiet_hours_end),
            quiet_hours_range: policy.quiet_range(),
            is_due: state.is_due(now.with_timezone(&Utc), policy.cadence),
            should_send: decision.should_send(),
            reason: decision.to_string(),
            last_sent_at: state.last_sent_at,
            next_due_at: state.next_due_at,
            cadence_days: policy.cadence.num_days(),
        }
    }

    /// Read the backing store without touching in-memory state.
    ///
    /// Returns whether a stored document exists.
    pub fn check_store(&self) -> Result<bool, StoreError> {
        self.store.load().map(|doc| doc.is_some())
    }

    pub fn location(&self) -> String {
        self.store.describe()
    }

    fn lock(&self) -> MutexGuard<'_, ScheduleState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}
