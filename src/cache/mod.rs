//! Cache Module
//!
//! Query result caching with table-driven invalidation and LRU eviction.

mod driver;
mod entry;
mod index;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use driver::QueryCacheDriver;
pub use entry::CacheEntry;
pub use index::TableIndex;
pub use lru::LruTracker;
pub use stats::{CacheStats, EntryStats};
pub use store::{CacheStore, DRIVER_NAME};

// == Public Constants ==
/// Default maximum number of cached results
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// A full store evicts `ceil(max_size / EVICTION_BATCH_DIVISOR)` entries
pub const EVICTION_BATCH_DIVISOR: usize = 10;
