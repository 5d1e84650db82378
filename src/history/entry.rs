//! Ledger entries and dedupe keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommendation::Category;

/// Normalized identity of a recommendation: `category:name`, with the name
/// trimmed, lower-cased and internal whitespace collapsed.
pub fn dedupe_key(category: Category, name: &str) -> String {
    let normalized = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    format!("{}:{}", category.as_str(), normalized)
}

/// One sent recommendation. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub category: Category,
    pub name: String,
    pub dedupe_key: String,
    pub detail_text: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(category: Category, name: &str, detail_text: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            category,
            name: name.trim().to_string(),
            dedupe_key: dedupe_key(category, name),
            detail_text: detail_text.to_string(),
            created_at,
        }
    }
}
