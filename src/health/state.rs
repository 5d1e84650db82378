//! Health status model and aggregation.
//!
//! # Aggregation
//! ```text
//! no results                → Unknown
//! every check Healthy       → Healthy
//! any check Unhealthy       → Unhealthy
//! any check Degraded        → Degraded
//! otherwise (some Unknown)  → Unknown
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheckResult {
    pub service: String,
    pub status: HealthStatus,
    pub response_time: Option<Duration>,
    pub message: Option<String>,
    pub details: BTreeMap<String, Value>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn new(service: impl Into<String>, status: HealthStatus, checked_at: DateTime<Utc>) -> Self {
        Self {
            service: service.into(),
            status,
            response_time: None,
            message: None,
            details: BTreeMap::new(),
            checked_at,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn response_time(mut self, elapsed: Duration) -> Self {
        self.response_time = Some(elapsed);
        self
    }

    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Overall status of a set of checks.
pub fn overall_status(results: &[HealthCheckResult]) -> HealthStatus {
    if results.is_empty() {
        return HealthStatus::Unknown;
    }
    let any = |status| results.iter().any(|r| r.status == status);

    if results.iter().all(|r| r.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else if any(HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if any(HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Unknown
    }
}
