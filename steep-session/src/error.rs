//! Session error types

use serde::Serialize;
use std::fmt;
use steep_http::HttpError;
use steep_scrape::ScrapeError;
use thiserror::Error;

/// Errors that stop a whole run rather than one iteration
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid selector configuration: {0}")]
    Selectors(#[from] ScrapeError),

    #[error("Database reset failed: {0}")]
    ResetFailed(#[source] HttpError),

    #[error("HTTP client error: {0}")]
    Http(#[from] HttpError),

    #[error("Load harness error: {0}")]
    Harness(String),
}

/// A request that could not be completed at all
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<HttpError> for BrowserError {
    fn from(error: HttpError) -> Self {
        BrowserError::Transport(error.to_string())
    }
}

/// What went wrong in a failed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Unexpected response status
    HttpStatus,
    /// An expected element was not on the page
    ScrapeMiss,
    /// The login page carried no anti-forgery token
    TokenMissing,
    /// Credentials were posted but the session did not authenticate
    LoginRejected,
    /// The page did not show the expected outcome
    Verification,
    /// No response was received
    Transport,
}

impl FailureKind {
    pub fn tag(&self) -> &'static str {
        match self {
            FailureKind::HttpStatus => "http-status",
            FailureKind::ScrapeMiss => "scrape-miss",
            FailureKind::TokenMissing => "token-missing",
            FailureKind::LoginRejected => "login-rejected",
            FailureKind::Verification => "verification",
            FailureKind::Transport => "transport",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A failed step. Ends the current iteration, never the run.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{step}: [{kind}] {message}")]
pub struct StepFailure {
    pub kind: FailureKind,
    pub step: String,
    pub message: String,
}

impl StepFailure {
    pub fn new(kind: FailureKind, step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn status(step: &str, status: u16, accepted: &[u16]) -> Self {
        Self::new(
            FailureKind::HttpStatus,
            step,
            format!("status {} not in {:?}", status, accepted),
        )
    }

    pub fn transport(step: &str, error: &BrowserError) -> Self {
        Self::new(FailureKind::Transport, step, error.to_string())
    }

    /// `tag: message`, as handed to the harness
    pub fn harness_tag(&self) -> String {
        format!("{}: {}", self.kind.tag(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = StepFailure::new(FailureKind::TokenMissing, "/login", "no token on login page");
        assert_eq!(failure.to_string(), "/login: [token-missing] no token on login page");
        assert_eq!(failure.harness_tag(), "token-missing: no token on login page");
    }

    #[test]
    fn test_status_failure() {
        let failure = StepFailure::status("/cart", 500, &[200]);
        assert_eq!(failure.kind, FailureKind::HttpStatus);
        assert!(failure.message.contains("500"));
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let json = serde_json::to_string(&FailureKind::ScrapeMiss).unwrap();
        assert_eq!(json, "\"scrape-miss\"");
    }
}
