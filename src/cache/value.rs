//! Stored Value Module
//!
//! The values callers hand to the cache, their byte encoding in the backing
//! store, and their literal rendering in replay traces.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Stored Value ==
/// A value accepted by [`InstrumentedCache::store`](crate::cache::InstrumentedCache::store).
///
/// The JSON form is untagged: integers, floats, strings and byte arrays map to
/// the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl StoredValue {
    // == Encode ==
    /// Encodes the value the way the backing store keeps it.
    ///
    /// Text is written as UTF-8 and numbers in decimal, so a stored integer
    /// reads back as its digits.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StoredValue::Integer(i) => i.to_string().into_bytes(),
            StoredValue::Float(f) => format!("{:?}", f).into_bytes(),
            StoredValue::Text(s) => s.as_bytes().to_vec(),
            StoredValue::Bytes(b) => b.clone(),
        }
    }

    // == Literal ==
    /// Renders the value as a literal for call logs.
    pub fn literal(&self) -> String {
        match self {
            StoredValue::Integer(i) => i.to_string(),
            StoredValue::Float(f) => format!("{:?}", f),
            StoredValue::Text(s) => format!("{:?}", s),
            StoredValue::Bytes(b) => bytes_literal(b),
        }
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(value: Vec<u8>) -> Self {
        StoredValue::Bytes(value)
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Integer(value)
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Float(value)
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

// == Raw Literal ==
/// Renders raw bytes read back from the store.
///
/// Valid UTF-8 renders as a quoted string, anything else as a byte literal.
pub fn raw_literal(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(text) => format!("{:?}", text),
        Err(_) => bytes_literal(raw),
    }
}

fn bytes_literal(raw: &[u8]) -> String {
    format!("b\"{}\"", raw.escape_ascii())
}
