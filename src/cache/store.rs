//! Cache Store Module
//!
//! In-process query cache: entry storage, table index and LRU order kept in
//! lockstep by every mutating operation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{
    CacheEntry, CacheStats, EntryStats, LruTracker, QueryCacheDriver, TableIndex,
    EVICTION_BATCH_DIVISOR,
};
use crate::error::Result;
use crate::sql::TableExtractor;

/// Identifier reported by [`CacheStore`] in its stats.
pub const DRIVER_NAME: &str = "memory";

// == Cache Store ==
/// In-process query cache with table-driven invalidation and batch LRU eviction.
///
/// Not coherent across processes. Hosts that share one instance between
/// threads wrap it in a single lock so each operation runs in one critical
/// section.
#[derive(Debug)]
pub struct CacheStore<R> {
    /// Key to entry storage
    entries: HashMap<String, CacheEntry<R>>,
    /// Table to keys inverted index
    index: TableIndex,
    /// Access order for eviction
    lru: LruTracker,
    /// Shared extractor, also used by the connection layer
    extractor: Arc<TableExtractor>,
    /// Maximum number of entries, 0 disables storage
    max_size: usize,
    /// Emit debug events on eviction and invalidation
    logging_enabled: bool,
    /// Entries removed by the LRU policy since the last flush
    evictions: u64,
    /// Entries removed by invalidation since the last flush
    invalidations: u64,
}

impl<R> CacheStore<R> {
    // == Constructor ==
    /// Creates a store with its own extractor.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of cached results, 0 disables storage
    /// * `logging_enabled` - Emit debug events on eviction and invalidation
    pub fn new(max_size: usize, logging_enabled: bool) -> Self {
        Self::with_extractor(max_size, logging_enabled, Arc::new(TableExtractor::new()))
    }

    /// Creates a store that shares `extractor` with its callers.
    pub fn with_extractor(
        max_size: usize,
        logging_enabled: bool,
        extractor: Arc<TableExtractor>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            index: TableIndex::new(),
            lru: LruTracker::new(),
            extractor,
            max_size,
            logging_enabled,
            evictions: 0,
            invalidations: 0,
        }
    }

    // == Get ==
    /// Returns the cached result without touching hit counters or order.
    pub fn get(&self, key: &str) -> Option<&R> {
        self.entries.get(key).map(|entry| &entry.result)
    }

    /// Returns the full entry for `key`.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<R>> {
        self.entries.get(key)
    }

    // == Has ==
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Put ==
    /// Caches `result` under `key`, indexed by the tables `query` references.
    ///
    /// Evicts a batch of least recently used entries first when at capacity.
    /// Overwriting a key replaces its entry, index rows and hit count.
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `result` - Payload to store
    /// * `query` - Originating SQL, scanned for table references
    /// * `executed_at` - When the statement ran
    pub fn put(
        &mut self,
        key: impl Into<String>,
        result: R,
        query: impl Into<String>,
        executed_at: DateTime<Utc>,
    ) {
        if self.is_disabled() {
            return;
        }

        self.evict_if_needed();

        let query = query.into();
        let tables = self.extractor.extract(&query);
        self.store_entry(CacheEntry::new(key, result, Some(tables), query, executed_at));
    }

    // == Insert Entry ==
    /// Caches a prebuilt entry as-is, indexing whatever `tables` it carries.
    ///
    /// Entries without tables are reachable only through a full invalidation.
    pub fn insert_entry(&mut self, entry: CacheEntry<R>) {
        if self.is_disabled() {
            return;
        }

        self.evict_if_needed();
        self.store_entry(entry);
    }

    // == Record Hit ==
    /// Counts a hit and moves `key` to the most recently used position.
    ///
    /// Returns false if the key is not cached.
    pub fn record_hit(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.record_hit();
                self.lru.touch(key);
                true
            }
            None => false,
        }
    }

    // == Forget ==
    /// Removes `key`. Returns false if it was not cached.
    pub fn forget(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Invalidate Tables ==
    /// Removes every entry that depends on any of `tables`.
    ///
    /// An empty `tables` means the affected tables are unknown, so the whole
    /// cache is cleared. Returns the number of entries removed.
    pub fn invalidate_tables<S: AsRef<str>>(&mut self, tables: &[S], query: &str) -> usize {
        if tables.is_empty() {
            let cleared = self.entries.len();
            self.clear_storage();
            self.invalidations += cleared as u64;

            if cleared > 0 && self.logging_enabled {
                debug!(
                    query,
                    cleared_count = cleared,
                    "Query cache: cleared entire cache (could not determine affected tables)"
                );
            }
            return cleared;
        }

        let keys = self.index.keys_for(tables);
        for key in &keys {
            self.remove_entry(key);
        }

        let invalidated = keys.len();
        self.invalidations += invalidated as u64;

        if invalidated > 0 && self.logging_enabled {
            let affected: Vec<&str> = tables.iter().map(AsRef::as_ref).collect();
            debug!(
                query,
                affected_tables = ?affected,
                invalidated_count = invalidated,
                "Query cache: invalidated cached queries"
            );
        }

        invalidated
    }

    // == Flush ==
    /// Removes every entry and resets the counters.
    pub fn flush(&mut self) {
        self.clear_storage();
        self.evictions = 0;
        self.invalidations = 0;
    }

    // == Stats ==
    /// Returns a snapshot, entries listed least recently used first.
    ///
    /// Entries inserted without tables get them extracted for display only.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::empty(DRIVER_NAME);
        stats.evictions = self.evictions;
        stats.invalidations = self.invalidations;

        for entry in self.lru.keys().filter_map(|key| self.entries.get(key)) {
            let tables = match &entry.tables {
                Some(tables) => tables.clone(),
                None => self.extractor.extract(&entry.query),
            };

            stats.push_entry(EntryStats {
                key: entry.key.clone(),
                query: entry.query.clone(),
                tables,
                hits: entry.hits,
                cached_at: entry.executed_at,
            });
        }

        stats
    }

    // == All Keys ==
    /// Keys from least to most recently used.
    pub fn all_keys(&self) -> Vec<String> {
        self.lru.keys().cloned().collect()
    }

    /// Iterates cached entries in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry<R>> {
        self.entries.values()
    }

    /// Read access to the table index.
    pub fn table_index(&self) -> &TableIndex {
        &self.index
    }

    /// The extractor used to index entries.
    pub fn extractor(&self) -> &Arc<TableExtractor> {
        &self.extractor
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_disabled(&self) -> bool {
        if self.max_size == 0 && self.logging_enabled {
            debug!("Query cache: max_size is 0, result not stored");
        }
        self.max_size == 0
    }

    // == Evict If Needed ==
    /// Drops the least recently used tenth of capacity, at least one entry,
    /// once the store is full.
    fn evict_if_needed(&mut self) {
        let count = self.entries.len();
        if count < self.max_size {
            return;
        }

        let batch = self.max_size.div_ceil(EVICTION_BATCH_DIVISOR).max(1).min(count);
        let mut evicted = 0;

        for _ in 0..batch {
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.index.remove(&key, entry.indexed_tables());
                evicted += 1;
            }
        }

        self.evictions += evicted;

        if evicted > 0 && self.logging_enabled {
            debug!(
                evicted_count = evicted,
                remaining_count = self.entries.len(),
                "Query cache: evicted LRU entries"
            );
        }
    }

    fn store_entry(&mut self, entry: CacheEntry<R>) {
        if let Some(old) = self.entries.remove(&entry.key) {
            self.index.remove(&old.key, old.indexed_tables());
        }

        self.index.add(&entry.key, entry.indexed_tables());
        self.lru.touch(&entry.key);
        self.entries.insert(entry.key.clone(), entry);
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<R>> {
        let entry = self.entries.remove(key)?;
        self.index.remove(key, entry.indexed_tables());
        self.lru.remove(key);
        Some(entry)
    }

    fn clear_storage(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.lru.clear();
    }
}

// == Driver Implementation ==
impl<R: Clone> QueryCacheDriver<R> for CacheStore<R> {
    fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn get(&self, key: &str) -> Result<Option<R>> {
        Ok(CacheStore::get(self, key).cloned())
    }

    fn has(&self, key: &str) -> Result<bool> {
        Ok(CacheStore::has(self, key))
    }

    fn put(
        &mut self,
        key: String,
        result: R,
        query: &str,
        executed_at: DateTime<Utc>,
    ) -> Result<()> {
        CacheStore::put(self, key, result, query, executed_at);
        Ok(())
    }

    fn record_hit(&mut self, key: &str) -> Result<()> {
        CacheStore::record_hit(self, key);
        Ok(())
    }

    fn forget(&mut self, key: &str) -> Result<()> {
        CacheStore::forget(self, key);
        Ok(())
    }

    fn invalidate_tables(&mut self, tables: &[String], query: &str) -> Result<usize> {
        Ok(CacheStore::invalidate_tables(self, tables, query))
    }

    fn flush(&mut self) -> Result<()> {
        CacheStore::flush(self);
        Ok(())
    }

    fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStore::stats(self))
    }

    fn all_keys(&self) -> Result<Vec<String>> {
        Ok(CacheStore::all_keys(self))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn put_sql(store: &mut CacheStore<String>, key: &str, sql: &str) {
        store.put(key, format!("result_{key}"), sql, Utc::now());
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(100, false);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "k1", "SELECT * FROM users");

        assert_eq!(store.get("k1"), Some(&"result_k1".to_string()));
        assert!(store.has("k1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_does_not_count_hits() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "k1", "SELECT * FROM users");

        store.get("k1");
        store.get("k1");

        assert_eq!(store.entry("k1").map(|e| e.hits), Some(0));
    }

    #[test]
    fn test_store_missing_key_is_noop() {
        let mut store: CacheStore<String> = CacheStore::new(100, false);

        assert_eq!(store.get("missing"), None);
        assert!(!store.has("missing"));
        assert!(!store.record_hit("missing"));
        assert!(!store.forget("missing"));
    }

    #[test]
    fn test_store_put_indexes_tables() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "k1", "SELECT * FROM users JOIN orders ON 1 = 1");

        let entry = store.entry("k1").unwrap();
        assert_eq!(entry.indexed_tables(), ["users", "orders"]);
        assert!(store.table_index().row("users").unwrap().contains("k1"));
        assert!(store.table_index().row("orders").unwrap().contains("k1"));
    }

    #[test]
    fn test_store_overwrite_reindexes() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "k1", "SELECT * FROM users");
        store.record_hit("k1");
        put_sql(&mut store, "k1", "SELECT * FROM orders");

        assert_eq!(store.len(), 1);
        assert!(store.table_index().row("users").is_none());
        assert!(store.table_index().row("orders").unwrap().contains("k1"));
        assert_eq!(store.entry("k1").map(|e| e.hits), Some(0));
    }

    #[test]
    fn test_store_forget_drops_empty_rows() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "k1", "SELECT * FROM users");
        put_sql(&mut store, "k2", "SELECT * FROM users JOIN orders ON 1 = 1");

        assert!(store.forget("k2"));

        assert!(store.table_index().row("orders").is_none());
        assert_eq!(store.table_index().row("users").map(|r| r.len()), Some(1));
        assert_eq!(store.all_keys(), ["k1"]);
    }

    #[test]
    fn test_store_invalidate_tables() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "a", "SELECT * FROM users");
        put_sql(&mut store, "b", "SELECT * FROM orders");
        put_sql(&mut store, "c", "SELECT * FROM users JOIN orders ON 1 = 1");

        let removed = store.invalidate_tables(&["users"], "UPDATE users SET x = 1");

        assert_eq!(removed, 2);
        assert!(!store.has("a"));
        assert!(store.has("b"));
        assert!(!store.has("c"));
        assert_eq!(store.stats().invalidations, 2);
    }

    #[test]
    fn test_store_invalidate_overlapping_tables_counts_once() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "c", "SELECT * FROM users JOIN orders ON 1 = 1");

        assert_eq!(store.invalidate_tables(&["users", "orders"], ""), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_invalidate_unindexed_table() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "a", "SELECT * FROM users");

        assert_eq!(store.invalidate_tables(&["audit_log"], ""), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_invalidate_unknown_clears_all() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "a", "SELECT * FROM users");
        put_sql(&mut store, "b", "SELECT * FROM orders");
        put_sql(&mut store, "c", "SELECT 1");

        let no_tables: [&str; 0] = [];
        let removed = store.invalidate_tables(&no_tables, "CALL refresh()");

        assert_eq!(removed, 3);
        assert!(store.is_empty());
        assert!(store.all_keys().is_empty());
        assert_eq!(store.table_index().table_count(), 0);
    }

    #[test]
    fn test_store_invalidate_unknown_on_empty_cache() {
        let mut store: CacheStore<String> = CacheStore::new(100, false);
        let no_tables: [&str; 0] = [];
        assert_eq!(store.invalidate_tables(&no_tables, ""), 0);
    }

    #[test]
    fn test_store_flush() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "a", "SELECT * FROM users");
        put_sql(&mut store, "b", "SELECT * FROM orders");

        store.flush();

        assert!(store.all_keys().is_empty());
        assert!(!store.has("a"));
        assert!(!store.has("b"));
        assert_eq!(store.table_index().table_count(), 0);
    }

    #[test]
    fn test_store_record_hit_counts() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "k1", "SELECT * FROM users");

        store.record_hit("k1");
        store.record_hit("k1");
        store.record_hit("k1");

        let stats = store.stats();
        assert_eq!(stats.entries[0].hits, 3);
        assert_eq!(stats.total_hits, 3);
    }

    #[test]
    fn test_store_record_hit_reorders() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "a", "SELECT * FROM t");
        put_sql(&mut store, "b", "SELECT * FROM t");
        put_sql(&mut store, "c", "SELECT * FROM t");

        store.record_hit("a");

        assert_eq!(store.all_keys(), ["b", "c", "a"]);
    }

    #[test]
    fn test_store_lru_eviction_skips_touched_entry() {
        let mut store = CacheStore::new(10, false);
        for i in 1..=10 {
            put_sql(&mut store, &format!("k{i}"), "SELECT * FROM users");
        }

        store.record_hit("k3");
        put_sql(&mut store, "k11", "SELECT * FROM users");

        assert_eq!(store.len(), 10);
        assert!(!store.has("k1"));
        assert!(store.has("k2"));
        assert!(store.has("k3"));
        assert!(store.has("k11"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_evicts_ten_percent_batch() {
        let mut store = CacheStore::new(20, false);
        for i in 0..20 {
            put_sql(&mut store, &format!("k{i}"), "SELECT * FROM users");
        }

        put_sql(&mut store, "new", "SELECT * FROM users");

        // ceil(20 * 0.1) = 2 evicted, then one inserted
        assert_eq!(store.len(), 19);
        assert!(!store.has("k0"));
        assert!(!store.has("k1"));
        assert!(store.has("k2"));
    }

    #[test]
    fn test_store_eviction_cleans_index() {
        let mut store = CacheStore::new(1, false);
        put_sql(&mut store, "a", "SELECT * FROM users");
        put_sql(&mut store, "b", "SELECT * FROM orders");

        assert_eq!(store.all_keys(), ["b"]);
        assert!(store.table_index().row("users").is_none());
    }

    #[test]
    fn test_store_zero_size_is_disabled() {
        let mut store = CacheStore::new(0, true);
        put_sql(&mut store, "a", "SELECT * FROM users");

        assert!(store.is_empty());
        assert!(!store.has("a"));
    }

    #[test]
    fn test_store_stats_lists_entries_in_access_order() {
        let mut store = CacheStore::new(100, false);
        put_sql(&mut store, "a", "SELECT * FROM users");
        put_sql(&mut store, "b", "SELECT * FROM orders");
        store.record_hit("a");

        let stats = store.stats();
        assert_eq!(stats.driver, DRIVER_NAME);
        assert_eq!(stats.cached_count, 2);
        assert_eq!(stats.entries[0].key, "b");
        assert_eq!(stats.entries[0].tables, ["orders"]);
        assert_eq!(stats.entries[1].key, "a");
        assert_eq!(stats.entries[1].query, "SELECT * FROM users");
    }

    #[test]
    fn test_store_stats_extracts_missing_tables_lazily() {
        let mut store = CacheStore::new(100, false);
        store.insert_entry(CacheEntry::new(
            "raw",
            "payload".to_string(),
            None,
            "SELECT * FROM invoices",
            Utc::now(),
        ));

        let stats = store.stats();
        assert_eq!(stats.entries[0].tables, ["invoices"]);
        // Display-only: the stored entry and index are untouched
        assert!(store.entry("raw").unwrap().tables.is_none());
        assert!(store.table_index().row("invoices").is_none());
    }

    #[test]
    fn test_store_shares_extractor_memo() {
        let extractor = Arc::new(TableExtractor::new());
        let mut store = CacheStore::with_extractor(100, false, extractor.clone());

        store.put("a", 1, "SELECT * FROM users", Utc::now());
        let _ = extractor.extract("SELECT * FROM users");

        assert_eq!(extractor.scan_count(), 1);
    }

    #[test]
    fn test_store_as_driver() {
        let mut store: CacheStore<u32> = CacheStore::new(100, false);
        let driver: &mut dyn QueryCacheDriver<u32> = &mut store;

        driver
            .put("k1".to_string(), 7, "SELECT * FROM users", Utc::now())
            .unwrap();
        driver.record_hit("k1").unwrap();

        assert_eq!(driver.get("k1").unwrap(), Some(7));
        assert!(driver.has("k1").unwrap());
        assert_eq!(driver.driver_name(), "memory");
        assert_eq!(driver.stats().unwrap().total_hits, 1);
        assert_eq!(
            driver
                .invalidate_tables(&["users".to_string()], "DELETE FROM users")
                .unwrap(),
            1
        );
        assert!(driver.all_keys().unwrap().is_empty());
    }
}
