//! Store Module
//!
//! The key-value backing store seam and its in-process implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheEntry, EntryData};
use crate::error::{CacheError, Result};

// == Store Trait ==
/// Key-value backing store.
///
/// Mirrors the `GET/SET/SETEX/INCR/RPUSH/LRANGE/FLUSHDB` command set. An
/// absent key is `Ok(None)` or an empty list, never an error. Every method
/// fails with [`CacheError::BackingStoreUnavailable`] once the store is gone.
#[async_trait]
pub trait Store: Send + Sync {
    /// Writes `value` under `key`, replacing whatever was there.
    ///
    /// With a `ttl` the entry stops being readable once it elapses.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Reads a scalar value.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increments the integer at `key`, starting from 0.
    async fn increment(&self, key: &str) -> Result<i64>;

    /// Appends `item` to the list at `key` and returns the new length.
    async fn append_to_list(&self, key: &str, item: Vec<u8>) -> Result<usize>;

    /// Reads the inclusive range `start..=end` of the list at `key`.
    ///
    /// Negative indices count from the end, so `(0, -1)` reads everything.
    async fn range_read(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>>;

    /// Clears the whole namespace.
    async fn flush(&self) -> Result<()>;

    /// Reads the integer at `key`, 0 if absent.
    async fn counter(&self, key: &str) -> Result<i64> {
        match self.get(key).await? {
            Some(raw) => parse_counter(key, &raw),
            None => Ok(0),
        }
    }
}

// == Memory Store ==
/// In-process [`Store`] over a `HashMap` behind an async `RwLock`.
///
/// Expiry is enforced lazily at read time; [`MemoryStore::cleanup_expired`]
/// reclaims expired entries physically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Set once the store has been disposed
    closed: AtomicBool,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Close ==
    /// Disposes the store; every later operation fails.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.entries.write().await.clear();
        info!("Memory store closed");
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Number of physically held entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CacheError::BackingStoreUnavailable(
                "memory store has been closed".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the entry at `key` unless it is missing or expired.
fn live<'a>(entries: &'a HashMap<String, CacheEntry>, key: &str) -> Option<&'a CacheEntry> {
    entries.get(key).filter(|entry| !entry.is_expired())
}

fn parse_counter(key: &str, raw: &[u8]) -> Result<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| CacheError::Decode(format!("value at '{}' is not an integer", key)))
}

fn wrong_type(key: &str, expected: &str) -> CacheError {
    CacheError::WrongType(format!("key '{}' does not hold a {}", key, expected))
}

#[async_trait]
impl Store for MemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.ensure_open()?;
        let entry = CacheEntry::new(EntryData::Scalar(value), ttl);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        let entries = self.entries.read().await;
        match live(&entries, key).map(|entry| &entry.data) {
            Some(EntryData::Scalar(value)) => Ok(Some(value.clone())),
            Some(EntryData::List(_)) => Err(wrong_type(key, "scalar")),
            None => Ok(None),
        }
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        self.ensure_open()?;
        let mut entries = self.entries.write().await;

        let (current, expires_at) = match live(&entries, key) {
            Some(entry) => match &entry.data {
                EntryData::Scalar(raw) => (parse_counter(key, raw)?, entry.expires_at),
                EntryData::List(_) => return Err(wrong_type(key, "scalar")),
            },
            None => (0, None),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Decode(format!("counter at '{}' overflowed", key)))?;

        let mut entry = CacheEntry::new(EntryData::Scalar(next.to_string().into_bytes()), None);
        entry.expires_at = expires_at;
        entries.insert(key.to_string(), entry);
        Ok(next)
    }

    async fn append_to_list(&self, key: &str, item: Vec<u8>) -> Result<usize> {
        self.ensure_open()?;
        let mut entries = self.entries.write().await;

        if live(&entries, key).is_none() {
            entries.insert(key.to_string(), CacheEntry::new(EntryData::List(Vec::new()), None));
        }

        match entries.get_mut(key).map(|entry| &mut entry.data) {
            Some(EntryData::List(items)) => {
                items.push(item);
                Ok(items.len())
            }
            _ => Err(wrong_type(key, "list")),
        }
    }

    async fn range_read(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>> {
        self.ensure_open()?;
        let entries = self.entries.read().await;

        let items = match live(&entries, key).map(|entry| &entry.data) {
            Some(EntryData::List(items)) => items,
            Some(EntryData::Scalar(_)) => return Err(wrong_type(key, "list")),
            None => return Ok(Vec::new()),
        };

        Ok(match list_bounds(items.len(), start, end) {
            Some((from, to)) => items[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    async fn flush(&self) -> Result<()> {
        self.ensure_open()?;
        let mut entries = self.entries.write().await;
        debug!("Flushing {} entries", entries.len());
        entries.clear();
        Ok(())
    }
}

// == Range Bounds ==
/// Resolves an inclusive, possibly negative `start..=end` against `len`.
///
/// Returns `None` when the range selects nothing.
fn list_bounds(len: usize, start: isize, end: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (start + len).max(0) } else { start };
    let end = if end < 0 { end + len } else { end.min(len - 1) };

    if len == 0 || start > end || start >= len {
        return None;
    }
    Some((start as usize, end as usize))
}
