//! API Module
//!
//! HTTP handlers and routing for the query cache diagnostics API.
//!
//! # Endpoints
//! - `PUT /entries` - Cache a result
//! - `GET /entries/:key` / `DELETE /entries/:key` - Inspect or forget an entry
//! - `POST /entries/:key/hit` - Record a hit
//! - `POST /invalidate` - Invalidate by table
//! - `POST /flush` - Drop everything
//! - `GET /keys`, `GET /stats` - Introspection
//! - `POST /extract` - Table extraction
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
