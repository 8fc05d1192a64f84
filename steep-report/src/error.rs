//! Report error types

use std::path::PathBuf;
use steep_scrape::ScrapeError;
use thiserror::Error;

/// Errors raised while reading artifacts or writing outputs
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Input not found: {0}")]
    MissingInput(PathBuf),

    #[error("Failed to {operation} {path}: {source}")]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Extraction failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("No usable data: {0}")]
    NoData(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(any(feature = "charts", feature = "pdf"))]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0} output not available in this build")]
    Unsupported(&'static str),
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            operation,
            source,
        }
    }
}

impl From<handlebars::RenderError> for ReportError {
    fn from(error: handlebars::RenderError) -> Self {
        ReportError::Template(error.to_string())
    }
}

impl From<handlebars::TemplateError> for ReportError {
    fn from(error: handlebars::TemplateError) -> Self {
        ReportError::Template(error.to_string())
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
