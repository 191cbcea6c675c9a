//! Cache Module
//!
//! Key-value backing store, generated-key value cache with call
//! instrumentation, and replay of recorded calls.

mod entry;
mod instrumented;
mod keygen;
mod replay;
mod store;
pub mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, EntryData};
pub use instrumented::{
    decode_float, decode_integer, decode_text, CacheOptions, InstrumentedCache, Operation,
};
pub use keygen::{KeyGenerator, UuidKeyGenerator};
pub use replay::{replay, Trace, TraceEntry};
pub use store::{MemoryStore, Store};
pub use value::StoredValue;
