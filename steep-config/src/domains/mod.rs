//! Domain-specific configuration modules

pub mod http;
pub mod load;
pub mod logging;
pub mod report;
pub mod session;
pub mod target;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main steep configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SteepConfig {
    /// Storefront under test
    #[serde(default)]
    pub target: target::TargetConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Simulated user behaviour
    #[serde(default)]
    pub session: session::SessionConfig,

    /// Load shape handed to the harness
    #[serde(default)]
    pub load: load::LoadConfig,

    /// Report inputs and outputs
    #[serde(default)]
    pub report: report::ReportConfig,
}

impl SteepConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.session.validate()?;
        self.load.validate()?;
        self.report.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = SteepConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
