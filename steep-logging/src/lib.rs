//! Logging setup for steep
//!
//! All crates log through `tracing` macros. This crate installs the global
//! subscriber once, from the logging domain of the configuration or from a
//! bare level string, and never panics when a subscriber is already set.

pub mod init;

pub use init::{filter_spec, init_logging_from_config, init_simple_tracing};
pub use steep_config::domains::logging::{LogFormat, LogLevel};
pub use steep_config::LoggingConfig;
