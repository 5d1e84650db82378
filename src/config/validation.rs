//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (hours 0-23, cadence > 0, thresholds >= 1)
//! - Check that configured URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NudgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use url::Url;

use crate::config::schema::{NudgeConfig, RetryConfig};

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `schedule.cadence_days`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &NudgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let schedule = &config.schedule;
    if schedule.quiet_hours_start > 23 {
        errors.push(ValidationError::new("schedule.quiet_hours_start", "must be between 0 and 23"));
    }
    if schedule.quiet_hours_end > 23 {
        errors.push(ValidationError::new("schedule.quiet_hours_end", "must be between 0 and 23"));
    }
    if schedule.cadence_days == 0 {
        errors.push(ValidationError::new("schedule.cadence_days", "must be greater than 0"));
    }

    check_retry("retry", &config.retry, &mut errors);
    for (category, retry) in &config.retry_overrides {
        check_retry(&format!("retry_overrides.{}", category), retry, &mut errors);
    }

    if config.breaker.failure_threshold == 0 {
        errors.push(ValidationError::new("breaker.failure_threshold", "must be at least 1"));
    }
    if config.breaker.recovery_timeout_secs == 0 {
        errors.push(ValidationError::new("breaker.recovery_timeout_secs", "must be greater than 0"));
    }

    if config.fetch.timeout_secs == 0 {
        errors.push(ValidationError::new("fetch.timeout_secs", "must be greater than 0"));
    }
    for (field, url) in [
        ("fetch.restaurant_url", &config.fetch.restaurant_url),
        ("fetch.poi_url", &config.fetch.poi_url),
        ("fetch.movie_url", &config.fetch.movie_url),
        ("notify.webhook_url", &config.notify.webhook_url),
    ] {
        if let Some(url) = url {
            if let Err(e) = Url::parse(url) {
                errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", url, e)));
            }
        }
    }

    if config.storage.history_file.is_empty() {
        errors.push(ValidationError::new("storage.history_file", "must not be empty"));
    }
    if config.storage.schedule_file.is_empty() {
        errors.push(ValidationError::new("storage.schedule_file", "must not be empty"));
    }
    if config.storage.history_file == config.storage.schedule_file {
        errors.push(ValidationError::new(
            "storage.schedule_file",
            "must differ from storage.history_file",
        ));
    }

    if config.daemon.tick_secs == 0 {
        errors.push(ValidationError::new("daemon.tick_secs", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_retry(prefix: &str, retry: &RetryConfig, errors: &mut Vec<ValidationError>) {
    if retry.max_attempts == 0 {
        errors.push(ValidationError::new(format!("{}.max_attempts", prefix), "must be at least 1"));
    }
    if retry.base_delay_ms > retry.max_delay_ms {
        errors.push(ValidationError::new(
            format!("{}.base_delay_ms", prefix),
            "must not exceed max_delay_ms",
        ));
    }
}
