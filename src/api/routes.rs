//! API Routes
//!
//! Configures the Axum router with all diagnostics endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    extract_handler, flush_handler, forget_handler, get_entry_handler, health_handler,
    invalidate_handler, keys_handler, put_entry_handler, record_hit_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /entries` - Cache a result
/// - `GET /entries/:key` - Inspect an entry
/// - `DELETE /entries/:key` - Forget an entry
/// - `POST /entries/:key/hit` - Record a cache hit
/// - `POST /invalidate` - Invalidate by table
/// - `POST /flush` - Drop everything
/// - `GET /keys` - Keys in access order
/// - `GET /stats` - Cache statistics
/// - `POST /extract` - Table extraction for a statement
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/entries", put(put_entry_handler))
        .route(
            "/entries/:key",
            get(get_entry_handler).delete(forget_handler),
        )
        .route("/entries/:key/hit", post(record_hit_handler))
        .route("/invalidate", post(invalidate_handler))
        .route("/flush", post(flush_handler))
        .route("/keys", get(keys_handler))
        .route("/stats", get(stats_handler))
        .route("/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
