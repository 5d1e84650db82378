//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mailer.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::recommendation::Category;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NudgeConfig {
    /// Quiet hours and cadence.
    pub schedule: ScheduleConfig,

    /// Default retry settings for provider calls.
    pub retry: RetryConfig,

    /// Per-category retry tuning; categories not listed use `retry`.
    pub retry_overrides: BTreeMap<Category, RetryConfig>,

    /// Circuit breaker settings (one breaker per category).
    pub breaker: BreakerConfig,

    /// Where history and schedule state live.
    pub storage: StorageConfig,

    /// Content provider endpoints.
    pub fetch: FetchConfig,

    /// Delivery settings.
    pub notify: NotifyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Long-running mode.
    pub daemon: DaemonConfig,
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            retry: RetryConfig::default(),
            retry_overrides: default_retry_overrides(),
            breaker: BreakerConfig::default(),
            storage: StorageConfig::default(),
            fetch: FetchConfig::default(),
            notify: NotifyConfig::default(),
            observability: ObservabilityConfig::default(),
            daemon: DaemonConfig::default(),
        }
    }
}

impl NudgeConfig {
    /// Retry settings for `category`, honouring overrides.
    pub fn retry_for(&self, category: Category) -> &RetryConfig {
        self.retry_overrides.get(&category).unwrap_or(&self.retry)
    }
}

/// Schedule configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Hour (0-23) at which quiet hours begin.
    pub quiet_hours_start: u32,

    /// Hour (0-23) at which quiet hours end (exclusive).
    pub quiet_hours_end: u32,

    /// Minimum days between two sends.
    pub cadence_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            quiet_hours_start: 23,
            quiet_hours_end: 7,
            cadence_days: 7,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Apply ±25% jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
            jitter: true,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,

    /// Seconds to wait after the last failure before probing again.
    pub recovery_timeout_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout_secs: 300,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding all state files.
    pub data_dir: PathBuf,

    /// History file name, relative to `data_dir`.
    pub history_file: String,

    /// Schedule file name, relative to `data_dir`.
    pub schedule_file: String,

    /// Entries older than this many days are pruned after each send.
    pub prune_after_days: u32,
}

impl StorageConfig {
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.data_dir.join(&self.schedule_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_file: "recommendation_history.json".to_string(),
            schedule_file: "schedule.json".to_string(),
            prune_after_days: 365,
        }
    }
}

/// Content provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Location passed to place-based providers.
    pub region: String,

    /// Per-call deadline in seconds.
    pub timeout_secs: u64,

    /// Extra live fetches allowed when a result was already sent before.
    pub max_duplicate_retries: u32,

    /// JSON endpoint for restaurant suggestions.
    pub restaurant_url: Option<String>,

    /// JSON endpoint for point-of-interest suggestions.
    pub poi_url: Option<String>,

    /// JSON endpoint for movie suggestions.
    pub movie_url: Option<String>,
}

impl FetchConfig {
    pub fn url_for(&self, category: Category) -> Option<&str> {
        match category {
            Category::Restaurant => self.restaurant_url.as_deref(),
            Category::PointOfInterest => self.poi_url.as_deref(),
            Category::Movie => self.movie_url.as_deref(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            region: "Charleston, SC".to_string(),
            timeout_secs: 10,
            max_duplicate_retries: 3,
            restaurant_url: None,
            poi_url: None,
            movie_url: None,
        }
    }
}

/// Delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NotifyConfig {
    /// Webhook receiving the final text; console output when unset.
    pub webhook_url: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the metrics endpoint in daemon mode.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DaemonConfig {
    /// Seconds between two scheduler checks.
    pub tick_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { tick_secs: 900 }
    }
}

/// Retry tuning the mailer ships with for each provider family.
pub fn default_retry_overrides() -> BTreeMap<Category, RetryConfig> {
    let places = RetryConfig {
        max_attempts: 4,
        base_delay_ms: 2000,
        max_delay_ms: 30_000,
        jitter: true,
    };
    let movies = RetryConfig {
        max_attempts: 3,
        base_delay_ms: 1000,
        max_delay_ms: 15_000,
        jitter: true,
    };

    BTreeMap::from([
        (Category::Restaurant, places.clone()),
        (Category::PointOfInterest, places),
        (Category::Movie, movies),
    ])
}
