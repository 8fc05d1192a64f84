//! Extraction error types

use thiserror::Error;

pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Errors raised while building extractors or decoding embedded data.
///
/// A selector that simply matches nothing is not an error; extractors return
/// `None` for that.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("No embedded object found for {0}")]
    MissingObject(String),

    #[error("Embedded object is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
