//! SQL Module
//!
//! Lightweight lexical helpers over raw statement text: table extraction,
//! statement classification and cache-key computation.

mod extractor;
mod statement;

pub use extractor::{scan_tables, TableExtractor};
pub use statement::{compute_key, should_cache, StatementKind};
