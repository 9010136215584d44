//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Memo Reset: Ends an extraction cycle by dropping the extractor memo

mod memo_reset;

pub use memo_reset::spawn_memo_reset_task;
