//! HTTP error types

use crate::types::HttpMethodError;

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(#[from] HttpMethodError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{method} {url} returned {status}, expected {expected}")]
    UnexpectedStatus {
        method: String,
        url: String,
        status: u16,
        expected: u16,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
