//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (retry, breaker, fallback and run counters)
//!     → tracing.rs (one span per run, keyed by run_id)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, daemon mode only)
//! ```
//!
//! # Design Decisions
//! - Metric calls are no-ops until an exporter is installed
//! - `RUST_LOG` always wins over the configured level

pub mod logging;
pub mod metrics;
pub mod tracing;
