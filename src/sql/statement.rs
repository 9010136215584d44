//! Statement Helpers
//!
//! Classification and cache-key computation used by the connection layer
//! before it calls into the cache store.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::config::Config;

/// Data-modifying keyword anywhere in a statement body.
static WRITE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:INSERT|UPDATE|DELETE|MERGE)\b").expect("write pattern must compile")
});

// == Statement Kind ==
/// Coarse statement category derived from the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Side-effect free, result may be cached
    Read,
    /// Mutates data or schema, triggers invalidation
    Write,
    /// Transaction control, session settings and anything unrecognised
    Other,
}

impl StatementKind {
    /// Classifies `sql` by its first keyword.
    ///
    /// `WITH` and `EXPLAIN` can wrap a data-modifying statement, so those are
    /// only reads when no write keyword follows.
    pub fn classify(sql: &str) -> Self {
        let trimmed = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        let keyword: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();

        match keyword.as_str() {
            "WITH" | "EXPLAIN" if WRITE_KEYWORD.is_match(trimmed) => Self::Write,
            "SELECT" | "WITH" | "SHOW" | "DESCRIBE" | "DESC" | "EXPLAIN" => Self::Read,
            "INSERT" | "UPDATE" | "DELETE" | "REPLACE" | "TRUNCATE" | "ALTER" | "DROP"
            | "CREATE" | "RENAME" | "MERGE" | "UPSERT" => Self::Write,
            _ => Self::Other,
        }
    }
}

/// Returns true when a statement of `kind` should go through the cache.
pub fn should_cache(kind: StatementKind, config: &Config) -> bool {
    config.enabled && config.max_size > 0 && kind == StatementKind::Read
}

// == Cache Key ==
/// Derives a stable cache key from statement text and bound parameters.
pub fn compute_key(sql: &str, bindings: &[Value]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hasher.update([0u8]);
    hasher.update(Value::from(bindings.to_vec()).to_string().as_bytes());
    hex::encode(hasher.finalize())
}
