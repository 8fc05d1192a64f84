//! Report inputs and outputs

use crate::error::ConfigResult;
use crate::validation::{validate_ordered, validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Artifact locations and rendering options for the report commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// k6 `--summary-export` JSON
    #[serde(default = "default_k6_summary")]
    pub k6_summary: PathBuf,

    /// Locust HTML report
    #[serde(default = "default_locust_report")]
    pub locust_report: PathBuf,

    /// JMeter HTML dashboard directory (contains `index.html`)
    #[serde(default = "default_jmeter_dir")]
    pub jmeter_dir: PathBuf,

    /// JMeter JTL samples in CSV form
    #[serde(default)]
    pub jtl: Option<PathBuf>,

    /// Dashboard HTML output
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// PDF rendition of the dashboard; `None` disables it
    #[serde(default = "default_pdf")]
    pub pdf: Option<PathBuf>,

    #[serde(default = "default_charts_dir")]
    pub charts_dir: PathBuf,

    /// Unified `{k6, locust, jmeter}` JSON summary
    #[serde(default)]
    pub summary: Option<PathBuf>,

    /// Data rows kept from an HTML table
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Samples per rolling error-rate window
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    #[serde(default)]
    pub apdex: ApdexConfig,
}

/// Apdex thresholds in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApdexConfig {
    #[serde(default = "default_satisfied_ms")]
    pub satisfied_ms: u64,

    #[serde(default = "default_tolerated_ms")]
    pub tolerated_ms: u64,

    /// Labels reported, in order; empty means every label in the file
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            k6_summary: default_k6_summary(),
            locust_report: default_locust_report(),
            jmeter_dir: default_jmeter_dir(),
            jtl: None,
            output: default_output(),
            pdf: default_pdf(),
            charts_dir: default_charts_dir(),
            summary: None,
            preview_rows: default_preview_rows(),
            rolling_window: default_rolling_window(),
            apdex: ApdexConfig::default(),
        }
    }
}

impl Default for ApdexConfig {
    fn default() -> Self {
        Self {
            satisfied_ms: default_satisfied_ms(),
            tolerated_ms: default_tolerated_ms(),
            labels: Vec::new(),
        }
    }
}

impl Validatable for ReportConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.preview_rows, "preview_rows", self.domain_name())?;
        validate_positive(self.rolling_window, "rolling_window", self.domain_name())?;

        if self.output.as_os_str().is_empty() {
            return Err(self.validation_error("output cannot be empty"));
        }

        self.apdex.validate()
    }

    fn domain_name(&self) -> &'static str {
        "report"
    }
}

impl Validatable for ApdexConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.satisfied_ms, "satisfied_ms", self.domain_name())?;
        validate_ordered(
            self.satisfied_ms,
            self.tolerated_ms,
            "apdex thresholds",
            self.domain_name(),
        )
    }

    fn domain_name(&self) -> &'static str {
        "report.apdex"
    }
}

fn default_k6_summary() -> PathBuf {
    PathBuf::from("k6-complex.json")
}

fn default_locust_report() -> PathBuf {
    PathBuf::from("locust-teastore/complex.html")
}

fn default_jmeter_dir() -> PathBuf {
    PathBuf::from("jmeter-teastore/report-complexos")
}

fn default_output() -> PathBuf {
    PathBuf::from("dashboard.html")
}

fn default_pdf() -> Option<PathBuf> {
    Some(PathBuf::from("dashboard.pdf"))
}

fn default_charts_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_preview_rows() -> usize {
    5
}

fn default_rolling_window() -> usize {
    50
}

fn default_satisfied_ms() -> u64 {
    500
}

fn default_tolerated_ms() -> u64 {
    1500
}
