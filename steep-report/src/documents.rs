//! PDF renditions of single tool reports

use crate::chart::JMETER_GRAPHS;
use crate::error::{ReportError, ReportResult};
use crate::extract::{load_k6_summary, read_locust_preview};
use crate::pdf::PdfDocument;
use std::path::Path;
use tracing::{info, warn};

const GRAPH_WIDTH: f64 = 500.0;
const GRAPH_HEIGHT: f64 = 300.0;

/// Rows of the Locust table kept in its PDF
const LOCUST_TABLE_ROWS: usize = 50;

/// The k6 summary JSON, pretty-printed
pub fn k6_pdf(summary: &Path, out: &Path) -> ReportResult<()> {
    let summary = load_k6_summary(summary)?;
    let pretty = serde_json::to_string_pretty(&summary)?;

    let mut doc = PdfDocument::new();
    doc.title("k6 report: TeaStore").spacer(12.0).code(&pretty);
    doc.save(out)?;

    info!(path = %out.display(), pages = doc.page_count(), "k6 PDF written");
    Ok(())
}

/// The first statistics table of a Locust report
pub fn locust_pdf(report: &Path, out: &Path) -> ReportResult<()> {
    let preview = read_locust_preview(report, LOCUST_TABLE_ROWS)?;

    let mut doc = PdfDocument::new();
    doc.title("Locust report: TeaStore").spacer(12.0);
    if preview.headers.is_empty() && preview.rows.is_empty() {
        warn!(path = %report.display(), "no table in Locust report");
        doc.paragraph("No statistics table found in the report.");
    } else {
        doc.heading(&preview.title).table(&preview.headers, &preview.rows);
    }
    doc.save(out)?;

    info!(path = %out.display(), "Locust PDF written");
    Ok(())
}

/// The three JMeter graphs from `graphs_dir`, each on its own block
pub fn jmeter_pdf(graphs_dir: &Path, out: &Path) -> ReportResult<()> {
    let mut doc = PdfDocument::new();
    doc.title("JMeter report: TeaStore").spacer(12.0);

    for name in JMETER_GRAPHS {
        let path = graphs_dir.join(name);
        if !path.exists() {
            return Err(ReportError::MissingInput(path));
        }
        let graph = image::open(&path)?.to_rgb8();
        doc.image(&graph, GRAPH_WIDTH, GRAPH_HEIGHT)?;
        doc.spacer(24.0);
    }
    doc.save(out)?;

    info!(path = %out.display(), pages = doc.page_count(), "JMeter PDF written");
    Ok(())
}
