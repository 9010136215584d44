//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheEntry;

/// Response body for GET /entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub result: Value,
    pub query: String,
    pub tables: Vec<String>,
    pub executed_at: DateTime<Utc>,
    pub hits: u64,
}

impl From<&CacheEntry<Value>> for EntryResponse {
    fn from(entry: &CacheEntry<Value>) -> Self {
        Self {
            key: entry.key.clone(),
            result: entry.result.clone(),
            query: entry.query.clone(),
            tables: entry.indexed_tables().to_vec(),
            executed_at: entry.executed_at,
            hits: entry.hits,
        }
    }
}

/// Response body for PUT /entries
#[derive(Debug, Clone, Serialize)]
pub struct PutEntryResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
    /// Tables the entry was indexed under
    pub tables: Vec<String>,
}

impl PutEntryResponse {
    pub fn new(key: impl Into<String>, tables: Vec<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cached successfully", key),
            key,
            tables,
        }
    }
}

/// Response body for POST /entries/:key/hit
#[derive(Debug, Clone, Serialize)]
pub struct HitResponse {
    pub key: String,
    pub hits: u64,
}

/// Response body for DELETE /entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct ForgetResponse {
    pub key: String,
    /// Whether the key was cached before the call
    pub removed: bool,
}

/// Response body for POST /invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Tables used for the lookup, empty for a full clear
    pub tables: Vec<String>,
    /// Number of entries removed
    pub invalidated: usize,
}

/// Response body for POST /flush
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub message: String,
    /// Number of entries dropped
    pub flushed: usize,
}

impl FlushResponse {
    pub fn new(flushed: usize) -> Self {
        Self {
            message: format!("Flushed {} cached queries", flushed),
            flushed,
        }
    }
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Keys from least to most recently used
    pub keys: Vec<String>,
    pub count: usize,
}

impl KeysResponse {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for POST /extract
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub tables: Vec<String>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
