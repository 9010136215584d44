//! Cache Entry Module
//!
//! Defines the structure for a single cached statement result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// One cached statement result and its dependency metadata.
///
/// The payload is opaque to the cache; only `tables` drives invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<R> {
    /// Caller-defined cache key
    pub key: String,
    /// The stored result set
    pub result: R,
    /// Tables the originating statement read, None if never extracted
    pub tables: Option<Vec<String>>,
    /// Original SQL text
    pub query: String,
    /// When the underlying statement ran
    pub executed_at: DateTime<Utc>,
    /// Number of confirmed cache hits
    pub hits: u64,
}

impl<R> CacheEntry<R> {
    // == Constructor ==
    /// Creates a new entry with a zero hit counter.
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `result` - Payload to store
    /// * `tables` - Extracted table set, or None to defer extraction
    /// * `query` - Originating SQL
    /// * `executed_at` - Execution timestamp
    pub fn new(
        key: impl Into<String>,
        result: R,
        tables: Option<Vec<String>>,
        query: impl Into<String>,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            result,
            tables,
            query: query.into(),
            executed_at,
            hits: 0,
        }
    }

    /// Tables recorded at insert time, empty when never extracted.
    pub fn indexed_tables(&self) -> &[String] {
        self.tables.as_deref().unwrap_or(&[])
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }
}
