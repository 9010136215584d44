//! Request DTOs for the diagnostics API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for PUT /entries
///
/// # Fields
/// - `key`: Cache key
/// - `result`: Arbitrary JSON payload
/// - `query`: Originating SQL, scanned for table references
/// - `executed_at`: Optional execution time, defaults to now
#[derive(Debug, Clone, Deserialize)]
pub struct PutEntryRequest {
    pub key: String,
    pub result: Value,
    pub query: String,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
}

impl PutEntryRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        if self.query.trim().is_empty() {
            return Some("Query cannot be empty".to_string());
        }
        None
    }
}

/// Request body for POST /invalidate
///
/// When `tables` is omitted they are extracted from `query`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub tables: Option<Vec<String>>,
    #[serde(default)]
    pub query: String,
}

/// Request body for POST /extract
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub sql: String,
}
