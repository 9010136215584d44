//! Cached Connection
//!
//! Reference statement-execution layer in front of a query cache driver.
//! Reads are served from the cache when possible, writes invalidate the
//! tables they touch, and any driver failure falls back to direct execution.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheStats, QueryCacheDriver};
use crate::config::Config;
use crate::sql::{compute_key, should_cache, StatementKind, TableExtractor};

// == Statement Executor ==
/// Executes statements against the underlying database.
pub trait StatementExecutor {
    /// Result set type, stored verbatim in the cache
    type Output: Clone;
    /// Database error type, passed through untouched
    type Error;

    fn execute(&mut self, sql: &str, bindings: &[Value]) -> Result<Self::Output, Self::Error>;
}

// == Cached Connection ==
/// Wraps an executor with a query cache driver.
pub struct CachedConnection<E, D> {
    executor: E,
    driver: D,
    extractor: Arc<TableExtractor>,
    config: Config,
}

impl<E, D> CachedConnection<E, D>
where
    E: StatementExecutor,
    D: QueryCacheDriver<E::Output>,
{
    /// Creates a connection. `extractor` should be the one `driver` indexes
    /// with, so both share one memo per cycle.
    pub fn new(executor: E, driver: D, extractor: Arc<TableExtractor>, config: Config) -> Self {
        Self {
            executor,
            driver,
            extractor,
            config,
        }
    }

    // == Run Statement ==
    /// Runs `sql` through the cache according to its statement kind.
    pub fn run(&mut self, sql: &str, bindings: &[Value]) -> Result<E::Output, E::Error> {
        let kind = StatementKind::classify(sql);

        if should_cache(kind, &self.config) {
            return self.run_read(sql, bindings);
        }

        let output = self.executor.execute(sql, bindings)?;

        // Writes invalidate even while caching is paused.
        if kind == StatementKind::Write {
            self.invalidate_for(sql);
        }

        Ok(output)
    }

    fn run_read(&mut self, sql: &str, bindings: &[Value]) -> Result<E::Output, E::Error> {
        let key = compute_key(sql, bindings);

        match self.driver.get(&key) {
            Ok(Some(cached)) => {
                if let Err(err) = self.driver.record_hit(&key) {
                    warn!(error = %err, "Query cache: failed to record hit");
                }
                debug!(key = %key, "Query cache: hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "Query cache unavailable, executing directly");
                return self.executor.execute(sql, bindings);
            }
        }

        let executed_at = Utc::now();
        let output = self.executor.execute(sql, bindings)?;

        if let Err(err) = self.driver.put(key, output.clone(), sql, executed_at) {
            warn!(error = %err, "Query cache: failed to store result");
        }

        Ok(output)
    }

    fn invalidate_for(&mut self, sql: &str) {
        let tables = self.extractor.extract(sql);

        if let Err(err) = self.driver.invalidate_tables(&tables, sql) {
            // A failed invalidation can leave stale entries behind.
            warn!(error = %err, query = sql, "Query cache: invalidation failed, flushing");
            if let Err(err) = self.driver.flush() {
                warn!(error = %err, "Query cache: flush failed");
            }
        }
    }

    // == Toggles ==
    /// Stops using the cache; statements run directly until re-enabled.
    pub fn disable_query_cache(&mut self) {
        self.config.enabled = false;
    }

    pub fn enable_query_cache(&mut self) {
        self.config.enabled = true;
    }

    pub fn is_query_cache_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Flushes every cached result.
    pub fn clear_query_cache(&mut self) -> crate::error::Result<()> {
        self.driver.flush()
    }

    pub fn query_cache_stats(&self) -> crate::error::Result<CacheStats> {
        self.driver.stats()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}
