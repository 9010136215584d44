//! Query Cache - table-aware read-query result cache
//!
//! Caches statement results keyed by the caller, indexes them by the tables
//! their SQL references, and invalidates by table when writes happen.

pub mod api;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod sql;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, QueryCacheDriver};
pub use config::Config;
pub use connection::{CachedConnection, StatementExecutor};
pub use sql::TableExtractor;
pub use tasks::spawn_memo_reset_task;
