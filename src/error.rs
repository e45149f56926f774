//! Error types for the image cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Image Cache Error Enum ==
/// Unified error type for the image cache.
#[derive(Error, Debug)]
pub enum ImageCacheError {
    /// No live cache entry for the property
    #[error("No cached images for property {0}")]
    NotFound(u64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Persisted blob could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Persisted blob or remote payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote image listing could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ImageCacheError {
    fn from(err: reqwest::Error) -> Self {
        ImageCacheError::Fetch(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ImageCacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            ImageCacheError::NotFound(_) => StatusCode::NOT_FOUND,
            ImageCacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ImageCacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ImageCacheError::Storage(_)
            | ImageCacheError::Serialization(_)
            | ImageCacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image cache.
pub type Result<T> = std::result::Result<T, ImageCacheError>;
