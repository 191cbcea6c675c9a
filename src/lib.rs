//! Call Cache - instrumented key-value cache with call replay
//!
//! Stores values under generated keys while counting and logging every call,
//! replays recorded calls, and memoizes web fetches for a fixed TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{InstrumentedCache, MemoryStore, Operation, Store, StoredValue};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{FetchCache, Fetcher};
pub use tasks::spawn_cleanup_task;
