//! Configuration Module
//!
//! Handles loading and managing query cache configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_MAX_SIZE;

/// Query cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether read statements go through the cache at all
    pub enabled: bool,
    /// Maximum number of cached results, 0 disables storage
    pub max_size: usize,
    /// Emit debug events on eviction and invalidation
    pub logging_enabled: bool,
    /// Diagnostics HTTP server port
    pub server_port: u16,
    /// Seconds between extractor memo resets
    pub memo_reset_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `QUERY_CACHE_ENABLED` - Enable caching (default: true)
    /// - `QUERY_CACHE_MAX_SIZE` - Maximum cached results, values <= 0 disable storage (default: 1000)
    /// - `QUERY_CACHE_LOG_ENABLED` - Log evictions and invalidations (default: false)
    /// - `QUERY_CACHE_PORT` - Diagnostics server port (default: 3000)
    /// - `QUERY_CACHE_MEMO_RESET_INTERVAL` - Memo reset frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: env::var("QUERY_CACHE_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.enabled),
            max_size: env::var("QUERY_CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.trim().parse::<i64>().ok())
                .map(clamp_max_size)
                .unwrap_or(defaults.max_size),
            logging_enabled: env::var("QUERY_CACHE_LOG_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.logging_enabled),
            server_port: env::var("QUERY_CACHE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            memo_reset_interval: env::var("QUERY_CACHE_MEMO_RESET_INTERVAL")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.memo_reset_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: DEFAULT_MAX_SIZE,
            logging_enabled: false,
            server_port: 3000,
            memo_reset_interval: 60,
        }
    }
}

/// Negative sizes mean "disabled", same as zero.
pub fn clamp_max_size(raw: i64) -> usize {
    usize::try_from(raw).unwrap_or(0)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
