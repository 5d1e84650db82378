//! In-memory persistence, for tests and dry runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::{StateStore, StoreError};

/// Keeps the serialized document in memory.
///
/// Values round-trip through JSON so behaviour matches the file store.
/// Clones share the same document.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw document text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::default();
        *store.doc.lock().unwrap_or_else(|p| p.into_inner()) = Some(raw.into());
        store
    }

    /// Raw stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.doc.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Make subsequent saves fail, simulating an unwritable disk.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl<T> StateStore<T> for MemoryStore
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>, StoreError> {
        match self.raw() {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(StoreError::Corrupt),
            None => Ok(None),
        }
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        let raw = serde_json::to_string(value).map_err(StoreError::Serialize)?;
        *self.doc.lock().unwrap_or_else(|p| p.into_inner()) = Some(raw);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
