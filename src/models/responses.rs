//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::StoredValue;
use crate::fetch::FetchStats;

/// Response body for the STORE operation (POST /store)
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// The generated key
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, decoded as requested
    pub value: StoredValue,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: StoredValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for GET /fetch
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    pub url: String,
    pub payload: String,
    /// Fetches of this URL so far, this one included
    pub access_count: i64,
}

/// Per-operation call counts
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallCounts {
    pub store: i64,
    pub get: i64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Fetch cache hits
    pub hits: u64,
    /// Fetch cache misses
    pub misses: u64,
    /// Failed collaborator calls
    pub failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Instrumented call counts
    pub calls: CallCounts,
    /// Entries physically held by the store
    pub total_entries: usize,
}

impl StatsResponse {
    pub fn new(stats: &FetchStats, calls: CallCounts, total_entries: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            failures: stats.failures,
            hit_rate: stats.hit_rate(),
            calls,
            total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
