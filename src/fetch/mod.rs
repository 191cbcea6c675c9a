//! Fetch Module
//!
//! Expiring cache of web responses keyed by URL, with per-URL access
//! counting and request deduplication.

mod cache;
mod fetcher;
mod stats;

pub use cache::{cached_key, count_key, FetchCache};
pub use fetcher::{Fetcher, HttpFetcher};
pub use stats::FetchStats;
