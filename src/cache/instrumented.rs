//! Instrumented Cache Module
//!
//! Stores values under generated keys and records, per operation, how many
//! times it was called along with the ordered inputs and outputs of each call.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::value::raw_literal;
use crate::cache::{replay, KeyGenerator, Store, StoredValue, Trace, UuidKeyGenerator};
use crate::error::{CacheError, Result};

// == Operation ==
/// An instrumented cache operation.
///
/// The qualified name is the counter key; the call logs live under
/// `<name>:inputs` and `<name>:outputs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Store,
    Get,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Store, Operation::Get];

    /// Stable name used as the counter key.
    pub fn qualified_name(&self) -> &'static str {
        match self {
            Operation::Store => "Cache.store",
            Operation::Get => "Cache.get",
        }
    }

    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.qualified_name())
    }

    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.qualified_name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

impl FromStr for Operation {
    type Err = CacheError;

    /// Accepts the short (`store`) or qualified (`Cache.store`) name.
    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| {
                op.qualified_name() == s
                    || op.qualified_name().strip_prefix("Cache.") == Some(s)
            })
            .ok_or_else(|| CacheError::InvalidRequest(format!("Unknown operation: {}", s)))
    }
}

// == Cache Options ==
/// Construction options for [`InstrumentedCache`].
#[derive(Debug, Clone, Copy)]
pub struct CacheOptions {
    /// Record call counts and call logs
    pub instrumented: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { instrumented: true }
    }
}

// == Instrumented Cache ==
/// Cache of opaque values under generated keys, with call instrumentation.
///
/// Recording happens once the wrapped call has succeeded. Counter increment
/// and both log appends run under one lock, so every completed call leaves
/// exactly one counter step and one index-aligned input/output pair.
pub struct InstrumentedCache {
    /// Backing key-value store
    store: Arc<dyn Store>,
    /// Source of fresh keys
    keys: Box<dyn KeyGenerator>,
    /// Whether calls are recorded
    instrumented: bool,
    /// Serializes the recording step
    record_lock: Mutex<()>,
}

impl InstrumentedCache {
    // == Constructor ==
    /// Creates an instrumented cache with UUID keys.
    ///
    /// Flushes the store so every run starts from a clean namespace.
    pub async fn new(store: Arc<dyn Store>) -> Result<Self> {
        Self::with_options(store, Box::new(UuidKeyGenerator), CacheOptions::default()).await
    }

    /// Creates a cache with an explicit key generator and options.
    ///
    /// Flushes the store like [`InstrumentedCache::new`].
    pub async fn with_options(
        store: Arc<dyn Store>,
        keys: Box<dyn KeyGenerator>,
        options: CacheOptions,
    ) -> Result<Self> {
        store.flush().await?;
        info!(
            "Cache initialized (instrumentation {})",
            if options.instrumented { "on" } else { "off" }
        );

        Ok(Self {
            store,
            keys,
            instrumented: options.instrumented,
            record_lock: Mutex::new(()),
        })
    }

    // == Store ==
    /// Stores `value` under a freshly generated key and returns the key.
    pub async fn store(&self, value: StoredValue) -> Result<String> {
        let key = self.keys.generate();
        self.store.set(&key, value.to_bytes(), None).await?;
        debug!("Stored value under {}", key);

        self.record(
            Operation::Store,
            format!("({},)", value.literal()),
            format!("{:?}", key),
        )
        .await?;

        Ok(key)
    }

    // == Get ==
    /// Reads the raw bytes stored under `key`.
    ///
    /// Returns `Ok(None)` when the key was never written or has been flushed.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let raw = self.store.get(key).await?;

        let output = match &raw {
            Some(bytes) => raw_literal(bytes),
            None => "None".to_string(),
        };
        self.record(Operation::Get, format!("({:?},)", key), output)
            .await?;

        Ok(raw)
    }

    /// Reads `key` and applies `decode` to the raw bytes.
    ///
    /// A decode failure leaves the already recorded `get` call untouched.
    pub async fn get_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        self.get(key).await?.as_deref().map(decode).transpose()
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_text(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_text).await
    }

    /// Reads `key` as a decimal integer.
    pub async fn get_integer(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode_integer).await
    }

    /// Reads `key` as a floating-point number.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, decode_float).await
    }

    // == Introspection ==
    /// Number of recorded calls to `op`.
    pub async fn call_count(&self, op: Operation) -> Result<i64> {
        self.store.counter(op.qualified_name()).await
    }

    /// Reconstructs the recorded history of `op`.
    pub async fn replay(&self, op: Operation) -> Result<Trace> {
        replay(self.store.as_ref(), op).await
    }

    async fn record(&self, op: Operation, input: String, output: String) -> Result<()> {
        if !self.instrumented {
            return Ok(());
        }

        let _guard = self.record_lock.lock().await;
        self.store.increment(op.qualified_name()).await?;
        self.store
            .append_to_list(&op.inputs_key(), input.into_bytes())
            .await?;
        self.store
            .append_to_list(&op.outputs_key(), output.into_bytes())
            .await?;
        Ok(())
    }
}

// == Decoders ==
/// Interprets raw bytes as UTF-8 text.
pub fn decode_text(raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec())
        .map_err(|e| CacheError::Decode(format!("value is not valid UTF-8: {}", e)))
}

/// Parses raw bytes as a decimal integer.
pub fn decode_integer(raw: &[u8]) -> Result<i64> {
    let text = decode_text(raw)?;
    text.trim()
        .parse()
        .map_err(|_| CacheError::Decode(format!("value {:?} is not an integer", text)))
}

/// Parses raw bytes as a floating-point number.
pub fn decode_float(raw: &[u8]) -> Result<f64> {
    let text = decode_text(raw)?;
    text.trim()
        .parse()
        .map_err(|_| CacheError::Decode(format!("value {:?} is not a number", text)))
}
