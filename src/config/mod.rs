//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + NUDGE_* environment
//!     → loader.rs (parse, deserialize, apply overrides)
//!     → validation.rs (semantic checks)
//!     → NudgeConfig (validated, immutable)
//!     → passed by reference to each component at startup
//!
//! In daemon mode:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → scheduler policy swapped atomically
//! ```
//!
//! # Design Decisions
//! - Only the schedule policy is hot-swapped; provider and breaker settings need a restart
//! - Every section has defaults, so an empty file is a valid configuration
//! - serde rejects malformed input; validation.rs rejects impossible values

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_effective, ConfigError};
pub use schema::NudgeConfig;
pub use schema::{BreakerConfig, FetchConfig, RetryConfig, ScheduleConfig, StorageConfig};
