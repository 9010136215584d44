//! API Handlers
//!
//! HTTP request handlers exposing the cache engine for diagnostics.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    EntryResponse, ExtractRequest, ExtractResponse, FlushResponse, ForgetResponse, HealthResponse,
    HitResponse, InvalidateRequest, InvalidateResponse, KeysResponse, PutEntryRequest,
    PutEntryResponse,
};
use crate::sql::TableExtractor;

/// Application state shared across all handlers.
///
/// Every handler holds the lock for the whole operation, so store and index
/// changes are never observed half-applied.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<CacheStore<Value>>>,
    /// Extractor shared with the store
    pub extractor: Arc<TableExtractor>,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    pub fn new(cache: CacheStore<Value>) -> Self {
        let extractor = cache.extractor().clone();
        Self {
            cache: Arc::new(RwLock::new(cache)),
            extractor,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// A disabled cache is hosted with zero capacity, so puts store nothing.
    pub fn from_config(config: &Config) -> Self {
        let extractor = Arc::new(TableExtractor::new());
        let max_size = if config.enabled { config.max_size } else { 0 };
        Self::new(CacheStore::with_extractor(
            max_size,
            config.logging_enabled,
            extractor,
        ))
    }
}

/// Handler for PUT /entries
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Json(req): Json<PutEntryRequest>,
) -> Result<Json<PutEntryResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let executed_at = req.executed_at.unwrap_or_else(Utc::now);
    let tables = state.extractor.extract(&req.query);

    let mut cache = state.cache.write().await;
    cache.put(req.key.clone(), req.result, req.query, executed_at);

    Ok(Json(PutEntryResponse::new(req.key, tables)))
}

/// Handler for GET /entries/:key
///
/// Read-only: does not count as a hit.
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let cache = state.cache.read().await;
    let entry = cache
        .entry(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(EntryResponse::from(entry)))
}

/// Handler for POST /entries/:key/hit
pub async fn record_hit_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HitResponse>> {
    let mut cache = state.cache.write().await;
    if !cache.record_hit(&key) {
        return Err(CacheError::NotFound(key));
    }

    let hits = cache.entry(&key).map(|entry| entry.hits).unwrap_or_default();
    Ok(Json(HitResponse { key, hits }))
}

/// Handler for DELETE /entries/:key
///
/// Idempotent: forgetting an absent key succeeds with `removed: false`.
pub async fn forget_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ForgetResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.forget(&key);

    Json(ForgetResponse { key, removed })
}

/// Handler for POST /invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Json<InvalidateResponse> {
    let tables = match req.tables {
        Some(tables) => tables,
        None => state.extractor.extract(&req.query),
    };

    let mut cache = state.cache.write().await;
    let invalidated = cache.invalidate_tables(&tables, &req.query);

    Json(InvalidateResponse {
        tables,
        invalidated,
    })
}

/// Handler for POST /flush
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    let mut cache = state.cache.write().await;
    let flushed = cache.len();
    cache.flush();

    Json(FlushResponse::new(flushed))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let cache = state.cache.read().await;
    Json(KeysResponse::new(cache.all_keys()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for POST /extract
pub async fn extract_handler(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Json<ExtractResponse> {
    Json(ExtractResponse {
        tables: state.extractor.extract(&req.sql),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
