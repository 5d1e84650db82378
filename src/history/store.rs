//! Deduplicating, write-through recommendation ledger.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::history::entry::{dedupe_key, HistoryEntry};
use crate::observability::metrics;
use crate::recommendation::Category;
use crate::storage::{load_or_default, StateStore, StoreError};

/// Aggregate view of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub recent_count_last_7_days: usize,
    pub last_entry_timestamp: Option<DateTime<Utc>>,
}

/// Ledger of past recommendations.
///
/// Every mutation is persisted before it returns; if persisting fails the
/// in-memory ledger is left unchanged.
pub struct HistoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
    store: Box<dyn StateStore<Vec<HistoryEntry>>>,
}

impl HistoryStore {
    /// Open the ledger, starting empty if the store is missing or corrupt.
    pub fn open(store: impl StateStore<Vec<HistoryEntry>> + 'static) -> Self {
        let loaded: Vec<HistoryEntry> = load_or_default(&store);

        let mut seen = HashSet::new();
        let total = loaded.len();
        let entries: Vec<_> = loaded
            .into_iter()
            .filter(|e| seen.insert(e.dedupe_key.clone()))
            .collect();
        if entries.len() != total {
            tracing::warn!(dropped = total - entries.len(), "Dropped duplicate history entries on load");
        }

        tracing::info!(entries = entries.len(), store = %store.describe(), "History loaded");
        metrics::record_history_size(entries.len());

        Self {
            entries: Mutex::new(entries),
            store: Box::new(store),
        }
    }

    /// Record a recommendation.
    ///
    /// Returns `Ok(false)` without touching the ledger when the same
    /// category and name were recorded before.
    pub fn add(
        &self,
        category: Category,
        name: &str,
        detail_text: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let entry = HistoryEntry::new(category, name, detail_text, now);
        let mut entries = self.lock();

        if entries.iter().any(|e| e.dedupe_key == entry.dedupe_key) {
            tracing::info!(key = %entry.dedupe_key, "Recommendation already in history");
            return Ok(false);
        }

        entries.push(entry);
        if let Err(e) = self.store.save(&entries) {
            entries.pop();
            return Err(e);
        }

        metrics::record_history_size(entries.len());
        Ok(true)
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        let key = dedupe_key(category, name);
        self.lock().iter().any(|e| e.dedupe_key == key)
    }

    /// Entries created within `[now - window, now]`, in insertion order.
    pub fn recent(&self, window: Duration, now: DateTime<Utc>) -> Vec<HistoryEntry> {
        let since = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.lock()
            .iter()
            .filter(|e| e.created_at >= since && e.created_at <= now)
            .cloned()
            .collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<HistoryEntry> {
        self.lock()
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn summary(&self, now: DateTime<Utc>) -> HistorySummary {
        let entries = self.lock();
        let since = now - Duration::days(7);

        let mut by_category = BTreeMap::new();
        for entry in entries.iter() {
            *by_category.entry(entry.category).or_insert(0) += 1;
        }

        HistorySummary {
            total: entries.len(),
            by_category,
            recent_count_last_7_days: entries
                .iter()
                .filter(|e| e.created_at >= since && e.created_at <= now)
                .count(),
            last_entry_timestamp: entries.last().map(|e| e.created_at),
        }
    }

    /// Remove entries created before `now - days`. Returns how many were removed.
    pub fn prune_older_than(&self, days: u32, now: DateTime<Utc>) -> Result<usize, StoreError> {
        // A cutoff before the start of the calendar keeps everything.
        let Some(cutoff) = now.checked_sub_signed(Duration::days(i64::from(days))) else {
            return Ok(0);
        };
        let mut entries = self.lock();

        let kept: Vec<HistoryEntry> = entries
            .iter()
            .filter(|e| e.created_at >= cutoff)
            .cloned()
            .collect();
        let removed = entries.len() - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        self.store.save(&kept)?;
        *entries = kept;

        tracing::info!(removed, days, "Pruned old history entries");
        metrics::record_history_size(entries.len());
        Ok(removed)
    }

    /// Read the backing store without touching the ledger.
    ///
    /// Returns whether a stored document exists.
    pub fn check_store(&self) -> Result<bool, StoreError> {
        self.store.load().map(|doc| doc.is_some())
    }

    /// Where the ledger is persisted.
    pub fn location(&self) -> String {
        self.store.describe()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::storage::MemoryStore;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_duplicate_is_rejected_case_insensitively() {
        let history = HistoryStore::open(MemoryStore::new());

        assert!(history.add(Category::Restaurant, "Husk Restaurant", "first", t0()).unwrap());
        assert!(!history.add(Category::Restaurant, "husk restaurant", "second", t0()).unwrap());
        assert_eq!(history.summary(t0()).total, 1);
        assert_eq!(history.by_category(Category::Restaurant)[0].detail_text, "first");

        // Same name, different category, is a different recommendation.
        assert!(history.add(Category::Movie, "Husk Restaurant", "doc", t0()).unwrap());
    }

    #[test]
    fn test_add_is_write_through() {
        let backing = MemoryStore::new();
        let history = HistoryStore::open(backing.clone());
        history.add(Category::Movie, "Chef", "details", t0()).unwrap();

        let reopened = HistoryStore::open(backing);
        assert!(reopened.contains(Category::Movie, "chef"));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_failed_save_leaves_ledger_unchanged() {
        let backing = MemoryStore::new();
        let history = HistoryStore::open(backing.clone());
        backing.set_fail_writes(true);

        assert!(history.add(Category::Movie, "Chef", "details", t0()).is_err());
        assert!(history.is_empty());

        backing.set_fail_writes(false);
        assert!(history.add(Category::Movie, "Chef", "details", t0()).unwrap());
    }

    #[test]
    fn test_corrupt_store_starts_empty() {
        let history = HistoryStore::open(MemoryStore::with_raw("[{\"broken\":"));
        assert!(history.is_empty());
        assert!(history.check_store().is_err());
        assert!(history.add(Category::Restaurant, "FIG Restaurant", "x", t0()).unwrap());
    }

    #[test]
    fn test_recent_window_is_inclusive_and_ordered() {
        let history = HistoryStore::open(MemoryStore::new());
        let now = t0();
        history.add(Category::Restaurant, "Old", "", now - Duration::days(31)).unwrap();
        history.add(Category::Movie, "Edge", "", now - Duration::days(30)).unwrap();
        history.add(Category::PointOfInterest, "New", "", now - Duration::hours(1)).unwrap();
        history.add(Category::Movie, "Future", "", now + Duration::hours(1)).unwrap();

        let names: Vec<_> = history
            .recent(Duration::days(30), now)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Edge", "New"]);
    }

    #[test]
    fn test_summary_counts() {
        let history = HistoryStore::open(MemoryStore::new());
        let now = t0();
        history.add(Category::Restaurant, "A", "", now - Duration::days(10)).unwrap();
        history.add(Category::Restaurant, "B", "", now - Duration::days(2)).unwrap();
        history.add(Category::Movie, "C", "", now - Duration::days(1)).unwrap();

        let summary = history.summary(now);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_category.get(&Category::Restaurant), Some(&2));
        assert_eq!(summary.by_category.get(&Category::Movie), Some(&1));
        assert_eq!(summary.by_category.get(&Category::PointOfInterest), None);
        assert_eq!(summary.recent_count_last_7_days, 2);
        assert_eq!(summary.last_entry_timestamp, Some(now - Duration::days(1)));
    }

    #[test]
    fn test_empty_summary() {
        let summary = HistoryStore::open(MemoryStore::new()).summary(t0());
        assert_eq!(summary.total, 0);
        assert!(summary.by_category.is_empty());
        assert_eq!(summary.last_entry_timestamp, None);
    }

    #[test]
    fn test_prune_mixed_ages() {
        let backing = MemoryStore::new();
        let history = HistoryStore::open(backing.clone());
        let now = t0();
        let ages = [45, 31, 30, 29, 5, 0];
        for (i, days) in ages.iter().enumerate() {
            history
                .add(Category::Restaurant, &format!("Place {i}"), "", now - Duration::days(*days))
                .unwrap();
        }

        assert_eq!(history.prune_older_than(30, now).unwrap(), 2);

        let reopened = HistoryStore::open(backing);
        let names: Vec<_> = reopened
            .by_category(Category::Restaurant)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Place 2", "Place 3", "Place 4", "Place 5"]);
        assert_eq!(history.prune_older_than(30, now).unwrap(), 0);
    }

    #[test]
    fn test_prune_with_enormous_age_limit_keeps_everything() {
        let history = HistoryStore::open(MemoryStore::new());
        history.add(Category::Movie, "Chef", "", t0() - Duration::days(3000)).unwrap();

        assert_eq!(history.prune_older_than(1_000_000_000, t0()).unwrap(), 0);
        assert_eq!(history.prune_older_than(u32::MAX, t0()).unwrap(), 0);
        assert_eq!(history.len(), 1);
    }
}
