//! Cache Entry Module
//!
//! Defines the structure for individual store entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Entry Data ==
/// What a key holds: a single byte string or an append-only list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    Scalar(Vec<u8>),
    List(Vec<Vec<u8>>),
}

// == Cache Entry ==
/// Represents a single store entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored data
    pub data: EntryData,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `data` - The data to store
    /// * `ttl` - Optional time-to-live
    pub fn new(data: EntryData, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        // Saturates, so an oversized TTL means "practically never"
        let expires_at = ttl.map(|ttl| {
            now.saturating_add(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
        });

        Self { data, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
