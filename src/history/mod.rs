//! Recommendation history.
//!
//! # Data Flow
//! ```text
//! Successful send
//!     → store.rs add() (dedupe on category + normalized name)
//!     → storage backend save (write-through)
//!
//! Orchestrator reads:
//!     recent() / summary() → category rotation, duplicate checks
//! ```
//!
//! # Design Decisions
//! - Duplicates are an expected outcome (`Ok(false)`), not an error
//! - Entries are immutable; only age-based pruning removes them
//! - Missing or corrupt ledger on load starts empty

pub mod entry;
pub mod store;

pub use entry::{dedupe_key, HistoryEntry};
pub use store::{HistoryStore, HistorySummary};
