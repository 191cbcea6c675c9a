//! Fetch Cache Module
//!
//! Memoizes fetched payloads per URL for a fixed TTL and counts every access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{decode_text, Store};
use crate::error::Result;
use crate::fetch::{FetchStats, Fetcher};

/// Serializes collaborator calls for one URL.
type Gate = Arc<tokio::sync::Mutex<()>>;

/// Counter key for the number of fetches of `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

/// Payload key for the cached body of `url`.
pub fn cached_key(url: &str) -> String {
    format!("cached:{}", url)
}

// == Fetch Cache ==
/// Expiring cache in front of a [`Fetcher`].
///
/// The access counter of a URL grows on every call, hit or miss, and never
/// expires. The payload expires after the configured TTL. Concurrent misses
/// for one URL share a single collaborator call.
pub struct FetchCache {
    /// Backing key-value store
    store: Arc<dyn Store>,
    /// Network collaborator
    fetcher: Arc<dyn Fetcher>,
    /// How long a payload stays servable
    ttl: Duration,
    /// Per-URL gates for collaborator calls in flight
    in_flight: Mutex<HashMap<String, Gate>>,
    /// Hit/miss accounting
    stats: Mutex<FetchStats>,
}

impl FetchCache {
    // == Constructor ==
    /// Creates a fetch cache whose payloads live for `ttl`.
    pub fn new(store: Arc<dyn Store>, fetcher: Arc<dyn Fetcher>, ttl: Duration) -> Self {
        Self {
            store,
            fetcher,
            ttl,
            in_flight: Mutex::new(HashMap::new()),
            stats: Mutex::new(FetchStats::new()),
        }
    }

    // == Fetch ==
    /// Returns the body behind `url`, from cache while it is live.
    ///
    /// Failures of the collaborator are propagated and never cached.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let accesses = self.store.increment(&count_key(url)).await?;
        debug!("Access #{} to {}", accesses, url);

        if let Some(payload) = self.cached(url).await? {
            return Ok(payload);
        }

        let lease = self.lease(url);
        let _guard = lease.gate.lock().await;
        // Another caller may have filled the entry while we waited
        match self.cached(url).await? {
            Some(payload) => Ok(payload),
            None => self.fetch_and_store(url).await,
        }
    }

    /// Number of fetches of `url` so far, 0 if never fetched.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        self.store.counter(&count_key(url)).await
    }

    /// Snapshot of hit/miss accounting.
    pub fn stats(&self) -> FetchStats {
        self.lock_stats().clone()
    }

    async fn cached(&self, url: &str) -> Result<Option<String>> {
        let Some(raw) = self.store.get(&cached_key(url)).await? else {
            return Ok(None);
        };

        let payload = decode_text(&raw)?;
        self.lock_stats().record_hit();
        debug!("Cache hit for {}", url);
        Ok(Some(payload))
    }

    async fn fetch_and_store(&self, url: &str) -> Result<String> {
        self.lock_stats().record_miss();
        debug!("Cache miss for {}, fetching", url);

        let payload = match self.fetcher.fetch(url).await {
            Ok(payload) => payload,
            Err(e) => {
                self.lock_stats().record_failure();
                warn!("Fetch of {} failed: {}", url, e);
                return Err(e);
            }
        };

        self.store
            .set(&cached_key(url), payload.clone().into_bytes(), Some(self.ttl))
            .await?;
        Ok(payload)
    }

    /// Takes a share of the gate for `url`, creating it if needed.
    fn lease(&self, url: &str) -> GateLease<'_> {
        let gate = self
            .lock_in_flight()
            .entry(url.to_string())
            .or_default()
            .clone();

        GateLease {
            cache: self,
            url: url.to_string(),
            gate,
        }
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, Gate>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_stats(&self) -> MutexGuard<'_, FetchStats> {
        self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// == Gate Lease ==
/// A caller's share of a per-URL gate.
///
/// Dropping the lease, on completion or cancellation, removes the gate from
/// the in-flight map once no other caller holds it.
struct GateLease<'a> {
    cache: &'a FetchCache,
    url: String,
    gate: Gate,
}

impl Drop for GateLease<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.cache.lock_in_flight();
        // One reference in the map, one here
        if Arc::strong_count(&self.gate) <= 2 {
            in_flight.remove(&self.url);
        }
    }
}
