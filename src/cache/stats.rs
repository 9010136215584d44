//! Cache Statistics Module
//!
//! Snapshot of cache contents and counters returned by `stats()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Entry Stats ==
/// Diagnostic view of one cached statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryStats {
    /// Cache key
    pub key: String,
    /// Originating SQL
    pub query: String,
    /// Tables the statement depends on
    pub tables: Vec<String>,
    /// Confirmed hits so far
    pub hits: u64,
    /// When the statement was executed
    pub cached_at: DateTime<Utc>,
}

// == Cache Stats ==
/// Point-in-time cache statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Backend identifier
    pub driver: String,
    /// Number of cached statements
    pub cached_count: usize,
    /// Sum of hits over all live entries
    pub total_hits: u64,
    /// Entries removed by the LRU policy
    pub evictions: u64,
    /// Entries removed by table invalidation
    pub invalidations: u64,
    /// Per-entry details, least recently used first
    pub entries: Vec<EntryStats>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates an empty snapshot for `driver`.
    pub fn empty(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            cached_count: 0,
            total_hits: 0,
            evictions: 0,
            invalidations: 0,
            entries: Vec::new(),
        }
    }

    // == Push Entry ==
    /// Appends an entry and folds it into the totals.
    pub fn push_entry(&mut self, entry: EntryStats) {
        self.cached_count += 1;
        self.total_hits += entry.hits;
        self.entries.push(entry);
    }
}
