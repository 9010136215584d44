//! Request and Response models for the diagnostics API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ExtractRequest, InvalidateRequest, PutEntryRequest, MAX_KEY_LENGTH};
pub use responses::{
    EntryResponse, ErrorResponse, ExtractResponse, FlushResponse, ForgetResponse, HealthResponse,
    HitResponse, InvalidateResponse, KeysResponse, PutEntryResponse,
};
