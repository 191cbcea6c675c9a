//! TTL Cleanup Task
//!
//! Background task that periodically reclaims expired store entries.
//! Reads already treat expired entries as absent; this only frees memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a background task that periodically removes expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between cleanup runs.
///
/// # Arguments
/// * `store` - Shared reference to the memory store
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    spawn_cleanup_task_every(store, Duration::from_secs(cleanup_interval_secs))
}

/// Like [`spawn_cleanup_task`] with an arbitrary interval.
pub fn spawn_cleanup_task_every(store: Arc<MemoryStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Store;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("expire_soon", b"value".to_vec(), Some(Duration::from_millis(50)))
            .await
            .unwrap();

        let handle = spawn_cleanup_task_every(store.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(350)).await;

        assert!(store.is_empty().await, "Expired entry should have been reclaimed");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("long_lived", b"value".to_vec(), Some(Duration::from_secs(3600)))
            .await
            .unwrap();
        store.increment("count:http://x").await.unwrap();

        let handle = spawn_cleanup_task_every(store.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(store.get("long_lived").await.unwrap(), Some(b"value".to_vec()));
        assert_eq!(store.counter("count:http://x").await.unwrap(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(MemoryStore::new());

        let handle = spawn_cleanup_task(store, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
