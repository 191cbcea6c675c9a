//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache, the fetch cache and the HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key or URL absent, flushed or expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored bytes cannot be interpreted as the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Operation applied to a key holding the wrong kind of value
    #[error("Wrong type: {0}")]
    WrongType(String),

    /// The fetch collaborator failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The backing key-value store can no longer be reached
    #[error("Backing store unavailable: {0}")]
    BackingStoreUnavailable(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::WrongType(_) => StatusCode::CONFLICT,
            CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::BackingStoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
