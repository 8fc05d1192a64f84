//! HTTP client functionality for steep
//!
//! A reqwest client that keeps cookies between requests, so a sequence of
//! calls behaves like one browser session. Used by the single-user probe and
//! for the preflight database reset; load runs use the harness's own client.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{FormFields, HttpMethod, HttpMethodError, PageResponse};
