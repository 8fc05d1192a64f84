//! Domain-driven configuration management for steep
//!
//! Configuration is split by functional domain (target, http, logging,
//! session, load, report), each with its own defaults and validation, and
//! can be loaded from YAML with environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    http::HttpConfig,
    load::{Flow, LoadConfig},
    logging::LoggingConfig,
    report::{ApdexConfig, ReportConfig},
    session::{SelectorConfig, SessionConfig, TokenPolicy},
    target::TargetConfig,
    SteepConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
