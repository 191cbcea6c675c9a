//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::StoredValue;

/// Request body for the STORE operation (POST /store)
///
/// # Fields
/// - `value`: The value to store; a JSON string, integer, float or byte array
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    pub value: StoredValue,
}

/// How GET /get/:key interprets the stored bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decode {
    /// Raw bytes, unchanged
    #[default]
    Raw,
    Text,
    Integer,
    Float,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    #[serde(rename = "as", default)]
    pub decode: Decode,
}

/// Query string for GET /fetch
#[derive(Debug, Clone, Deserialize)]
pub struct FetchQuery {
    pub url: String,
}

impl FetchQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Some("URL must use http or https".to_string());
        }
        None
    }
}
