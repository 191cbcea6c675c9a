//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{
    CacheOptions, InstrumentedCache, MemoryStore, Operation, StoredValue, Trace, UuidKeyGenerator,
};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{FetchCache, Fetcher, HttpFetcher};
use crate::models::{
    CallCounts, Decode, FetchQuery, FetchResponse, GetQuery, GetResponse, HealthResponse,
    StatsResponse, StoreRequest, StoreResponse,
};

/// Application state shared across all handlers.
///
/// The instrumented cache and the fetch cache share one backing store.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, kept for cleanup and stats
    pub store: Arc<MemoryStore>,
    /// Generated-key cache with call instrumentation
    pub cache: Arc<InstrumentedCache>,
    /// Expiring web response cache
    pub fetch: Arc<FetchCache>,
}

impl AppState {
    /// Creates a new AppState over `store` with the given fetch collaborator.
    ///
    /// Flushes the store through [`InstrumentedCache`] construction.
    pub async fn new(
        store: Arc<MemoryStore>,
        fetcher: Arc<dyn Fetcher>,
        fetch_ttl: Duration,
        options: CacheOptions,
    ) -> Result<Self> {
        let cache =
            InstrumentedCache::with_options(store.clone(), Box::new(UuidKeyGenerator), options)
                .await?;
        let fetch = FetchCache::new(store.clone(), fetcher, fetch_ttl);

        Ok(Self {
            store,
            cache: Arc::new(cache),
            fetch: Arc::new(fetch),
        })
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fetches go over HTTP with the configured timeout.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        let options = CacheOptions {
            instrumented: config.instrumentation,
        };

        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(fetcher),
            config.fetch_ttl(),
            options,
        )
        .await
    }
}

/// Handler for POST /store
///
/// Stores a value under a generated key and returns the key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.value).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value, decoded according to the `as` query parameter.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let cache = &state.cache;
    let value = match query.decode {
        Decode::Raw => cache.get(&key).await?.map(StoredValue::Bytes),
        Decode::Text => cache.get_text(&key).await?.map(StoredValue::Text),
        Decode::Integer => cache.get_integer(&key).await?.map(StoredValue::Integer),
        Decode::Float => cache.get_float(&key).await?.map(StoredValue::Float),
    };

    match value {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /replay/:operation
///
/// Returns the recorded call history of an operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<Trace>> {
    let op: Operation = operation.parse()?;
    let trace = state.cache.replay(op).await?;

    Ok(Json(trace))
}

/// Handler for GET /fetch?url=...
///
/// Returns the body behind `url`, cached for the configured TTL.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<FetchResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let payload = state.fetch.fetch(&query.url).await?;
    let access_count = state.fetch.access_count(&query.url).await?;

    Ok(Json(FetchResponse {
        url: query.url,
        payload,
        access_count,
    }))
}

/// Handler for GET /stats
///
/// Returns fetch cache efficiency and instrumented call counts.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let calls = CallCounts {
        store: state.cache.call_count(Operation::Store).await?,
        get: state.cache.call_count(Operation::Get).await?,
    };
    let total_entries = state.store.len().await;

    Ok(Json(StatsResponse::new(
        &state.fetch.stats(),
        calls,
        total_entries,
    )))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
