//! Scheduled recommendation mailer.
//!
//! Periodically picks a restaurant, place or movie suggestion and delivers
//! it, while respecting quiet hours and a minimum cadence and never repeating
//! itself. Live providers are wrapped in retries and circuit breakers; when
//! they fail a curated fallback is sent instead.

// Core pipeline
pub mod orchestrator;
pub mod provider;
pub mod recommendation;

// State
pub mod history;
pub mod scheduler;
pub mod storage;

// Failure handling
pub mod fallback;
pub mod resilience;

// Cross-cutting concerns
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::NudgeConfig;
pub use lifecycle::Shutdown;
pub use orchestrator::{Orchestrator, RunError, RunOutcome};
