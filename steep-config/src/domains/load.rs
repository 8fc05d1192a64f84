//! Load shape configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// User journey a simulated user repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Login, browse, add the first product to the cart and verify it
    #[default]
    Shopping,
    /// Login, visit the main pages, logout
    Navigation,
    /// Anonymous home page hits
    Homepage,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Shopping => "shopping",
            Flow::Navigation => "navigation",
            Flow::Homepage => "homepage",
        }
    }

    /// Whether the flow logs in when a user starts
    pub fn requires_login(&self) -> bool {
        !matches!(self, Flow::Homepage)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shopping" => Ok(Flow::Shopping),
            "navigation" => Ok(Flow::Navigation),
            "homepage" | "home" => Ok(Flow::Homepage),
            _ => Err(format!("Invalid flow: {}", s)),
        }
    }
}

/// Load shape handed to the harness
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    #[serde(default)]
    pub flow: Flow,

    /// Concurrent simulated users
    #[serde(default = "default_users")]
    pub users: usize,

    /// Users started per second
    #[serde(default = "default_hatch_rate")]
    pub hatch_rate: f64,

    /// Length of the run once all users are started
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_run_time"
    )]
    pub run_time: Duration,

    /// Optional HTML report written by the harness
    #[serde(default)]
    pub report_file: Option<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            flow: Flow::default(),
            users: default_users(),
            hatch_rate: default_hatch_rate(),
            run_time: default_run_time(),
            report_file: None,
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.users, "users", self.domain_name())?;
        validate_positive(self.hatch_rate, "hatch_rate", self.domain_name())?;
        validate_positive(self.run_time.as_secs(), "run_time", self.domain_name())?;

        if let Some(path) = &self.report_file {
            if !path.ends_with(".html") && !path.ends_with(".htm") {
                return Err(self.validation_error(format!(
                    "report_file must be an .html file, got '{}'",
                    path
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

fn default_users() -> usize {
    10
}

fn default_hatch_rate() -> f64 {
    1.0
}

fn default_run_time() -> Duration {
    Duration::from_secs(30)
}
