//! Storefront target configuration

use crate::error::ConfigResult;
use crate::validation::{validate_port_range, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Where the storefront under test lives.
///
/// `HOST`, `PORT` and `BASE_PATH` override these at process start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TargetConfig {
    /// Scheme and host, without port (e.g. `http://localhost`)
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix of the web UI
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl TargetConfig {
    /// Origin the harness connects to (`scheme://host:port`)
    pub fn origin(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }

    /// Absolute URL of a path below the base path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin(), self.path(path))
    }

    /// Host-relative path below the base path
    pub fn path(&self, path: &str) -> String {
        let base = self.base_path.trim_end_matches('/');
        if path.is_empty() {
            format!("{}/", base)
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.host, "host", self.domain_name())?;
        validate_port_range(self.port, "port", self.domain_name())?;

        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(self.validation_error(format!(
                "base_path must start with '/', got '{}'",
                self.base_path
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

fn default_host() -> String {
    "http://localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_path() -> String {
    "/tools.descartes.teastore.webui".to_string()
}
