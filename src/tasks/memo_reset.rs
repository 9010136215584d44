//! Memo Reset Task
//!
//! Background task that bounds the extractor memo in a long-lived process by
//! treating every interval as one processing cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::sql::TableExtractor;

/// Spawns a background task that periodically resets the extractor memo.
///
/// # Arguments
/// * `extractor` - Extractor shared with the cache store
/// * `interval_secs` - Cycle length in seconds
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let extractor = Arc::new(TableExtractor::new());
/// let handle = spawn_memo_reset_task(extractor.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_memo_reset_task(extractor: Arc<TableExtractor>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting extractor memo reset task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let dropped = extractor.reset();
            if dropped > 0 {
                debug!("Memo reset: dropped {} extracted statements", dropped);
            }
        }
    })
}
