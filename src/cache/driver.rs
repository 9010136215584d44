//! Cache Driver Contract
//!
//! Operation set every query cache backend provides. The in-process
//! [`CacheStore`](crate::cache::CacheStore) is the reference implementation;
//! shared backends must reproduce its invalidation and eviction semantics and
//! persist entries structurally equivalent to [`CacheEntry`](crate::cache::CacheEntry).

use chrono::{DateTime, Utc};

use crate::cache::CacheStats;
use crate::error::Result;

/// A query result cache backend over payloads of type `R`.
///
/// Missing keys are never errors. `Err` is reserved for backend failures,
/// which callers treat as "cache unavailable" and bypass.
pub trait QueryCacheDriver<R> {
    /// Short backend identifier reported in stats.
    fn driver_name(&self) -> &'static str;

    /// Cached result for `key`. Does not count as a hit.
    fn get(&self, key: &str) -> Result<Option<R>>;

    /// Whether `key` is cached.
    fn has(&self, key: &str) -> Result<bool>;

    /// Caches `result`, indexing it under the tables `query` references.
    fn put(&mut self, key: String, result: R, query: &str, executed_at: DateTime<Utc>)
        -> Result<()>;

    /// Counts a confirmed hit and marks `key` most recently used.
    fn record_hit(&mut self, key: &str) -> Result<()>;

    /// Removes `key` and its index memberships.
    fn forget(&mut self, key: &str) -> Result<()>;

    /// Removes every entry depending on any of `tables`; an empty slice
    /// clears the whole cache. Returns the number of entries removed.
    fn invalidate_tables(&mut self, tables: &[String], query: &str) -> Result<usize>;

    /// Removes everything.
    fn flush(&mut self) -> Result<()>;

    /// Snapshot of contents and counters.
    fn stats(&self) -> Result<CacheStats>;

    /// Keys from least to most recently used.
    fn all_keys(&self) -> Result<Vec<String>>;
}
