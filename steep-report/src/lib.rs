//! # steep reports
//!
//! Reads the artifacts k6, Locust and JMeter leave behind and turns them into
//! a combined HTML dashboard, an optional PDF, PNG charts and a unified JSON
//! summary. Also provides the single-tool utilities: JMeter graphs, failure
//! extraction and the Apdex report, Locust embedded statistics and per-tool
//! PDFs.
//!
//! ## Features
//!
//! - **charts** (default): PNG charts via `image`
//! - **pdf** (default): PDF output; implies `charts`
//!
//! Without a feature the matching outputs are skipped with a warning, see
//! [`SinkSet`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use steep_config::ReportConfig;
//! use steep_report::{build_dashboard, SinkSet};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReportConfig::default();
//! let outcome = build_dashboard(&config, SinkSet::available())?;
//! println!("dashboard at {}", outcome.html.display());
//! # Ok(())
//! # }
//! ```

pub mod apdex;
#[cfg(feature = "charts")]
pub mod chart;
pub mod dashboard;
#[cfg(feature = "pdf")]
pub mod documents;
pub mod error;
pub mod extract;
pub mod failures;
pub mod output;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod sinks;
pub mod stats;
pub mod summary;
pub mod template;

pub use apdex::{ApdexReport, LabelApdex};
pub use dashboard::{build_dashboard, ChartRefs, Dashboard, DashboardOutcome, Link};
#[cfg(feature = "pdf")]
pub use documents::{jmeter_pdf, k6_pdf, locust_pdf};
pub use error::{ReportError, ReportResult};
pub use extract::{
    read_jmeter_report, read_k6_metrics, read_locust_preview, read_locust_stats, summarize_jtl, JmeterPreview,
    JmeterStatistics, JtlTable, K6Metrics, LocustPreview, LocustStats, SampleSummary,
};
pub use failures::{extract_failures, FailureEntry, FailureSummary};
#[cfg(feature = "pdf")]
pub use pdf::PdfDocument;
pub use sinks::SinkSet;
pub use summary::{JmeterSummary, UnifiedSummary};
pub use template::ReportTemplates;

use std::path::Path;
use steep_config::ApdexConfig;

/// Score a JTL file and write the Apdex HTML report to `output`
pub fn write_apdex_report(jtl: &Path, output: &Path, config: &ApdexConfig) -> ReportResult<ApdexReport> {
    let table = JtlTable::from_path(jtl)?;
    let report = ApdexReport::from_table(&table, config);
    let html = report.render_html(&ReportTemplates::new()?)?;
    output::write_artifact(output, html)?;
    tracing::info!(path = %output.display(), labels = report.labels.len(), "Apdex report written");
    Ok(report)
}

/// Draw the JMeter graphs of a JTL file into `out_dir`
#[cfg(feature = "charts")]
pub fn write_jmeter_graphs(jtl: &Path, out_dir: &Path, window: usize) -> ReportResult<Vec<std::path::PathBuf>> {
    let table = JtlTable::from_path(jtl)?;
    chart::write_jmeter_graphs(&table, out_dir, window)
}
