//! Durable state persistence.
//!
//! # Responsibilities
//! - Load and save whole-document state (history ledger, schedule)
//! - Tolerate a missing store on first run
//!
//! # Design Decisions
//! - Whole-document `load`/`save`; documents are small
//! - Saves are atomic (write temp file, then rename)
//! - Corrupt documents surface as `StoreError::Corrupt` so callers can decide to start empty

use thiserror::Error;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors that can occur while reading or writing state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored document is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A durable home for one document of type `T`.
pub trait StateStore<T>: Send + Sync {
    /// Read the stored document; `Ok(None)` when nothing was stored yet.
    fn load(&self) -> Result<Option<T>, StoreError>;

    /// Replace the stored document. Durable once this returns `Ok`.
    fn save(&self, value: &T) -> Result<(), StoreError>;

    /// Human-readable location, used in logs and health reports.
    fn describe(&self) -> String;
}

/// Load a document, falling back to `T::default()` when it is missing or unreadable.
pub fn load_or_default<T, S>(store: &S) -> T
where
    T: Default,
    S: StateStore<T> + ?Sized,
{
    match store.load() {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(store = %store.describe(), error = %e, "Unreadable state, starting empty");
            T::default()
        }
    }
}
