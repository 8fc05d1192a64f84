//! PNG charts for the dashboard and the JMeter graphs

mod canvas;
mod plots;

pub use canvas::Canvas;
pub use plots::{bar_chart, format_value, heatmap, line_chart, placeholder};

use crate::error::ReportResult;
use crate::extract::JtlTable;
use crate::stats;
use std::path::{Path, PathBuf};
use tracing::info;

pub const COMPARE_AVG: &str = "compare_avg.png";
pub const HEATMAP: &str = "heatmap_tools.png";
pub const RESPONSE_TIME: &str = "response_time.png";
pub const THROUGHPUT: &str = "throughput.png";
pub const ERROR_RATE: &str = "error_rate.png";

/// Graph files written by [`write_jmeter_graphs`], in page order
pub const JMETER_GRAPHS: [&str; 3] = [RESPONSE_TIME, THROUGHPUT, ERROR_RATE];

pub const PERCENTILE_COLUMNS: [&str; 3] = ["p90", "p95", "p99"];

/// Bar chart of average latency per tool; nothing is written without values
pub fn write_compare_avg(dir: &Path, averages: &[(String, f64)]) -> ReportResult<Option<PathBuf>> {
    if averages.is_empty() {
        return Ok(None);
    }
    let path = dir.join(COMPARE_AVG);
    bar_chart("Average response time", "ms", averages).save(&path)?;
    Ok(Some(path))
}

/// Heatmap of tools x p90/p95/p99. Without a single value a placeholder
/// explaining why is written in its place.
pub fn write_heatmap(dir: &Path, rows: &[(String, [Option<f64>; 3])]) -> ReportResult<PathBuf> {
    let path = dir.join(HEATMAP);
    let rows: Vec<&(String, [Option<f64>; 3])> =
        rows.iter().filter(|(_, values)| values.iter().any(Option::is_some)).collect();

    if rows.is_empty() {
        placeholder("Heatmap not available (no percentiles)").save(&path)?;
        return Ok(path);
    }

    let labels: Vec<String> = rows.iter().map(|(tool, _)| tool.clone()).collect();
    let matrix: Vec<Vec<Option<f64>>> = rows.iter().map(|(_, values)| values.to_vec()).collect();
    heatmap("Percentiles per tool (ms)", &labels, &PERCENTILE_COLUMNS, &matrix).save(&path)?;
    Ok(path)
}

/// Response time per sample, samples per second and rolling error rate
pub fn write_jmeter_graphs(table: &JtlTable, out_dir: &Path, window: usize) -> ReportResult<Vec<PathBuf>> {
    let latencies = table.latencies();
    let throughput: Vec<f64> = stats::per_second(&table.timestamps())
        .into_iter()
        .map(|count| count as f64)
        .collect();
    let error_rate: Vec<f64> = table
        .outcomes()
        .map(|outcomes| {
            stats::rolling_error_rate(&outcomes, window)
                .into_iter()
                .map(|rate| rate * 100.0)
                .collect()
        })
        .unwrap_or_default();

    let graphs = [
        (RESPONSE_TIME, line_chart("Response Time (ms)", "ms", "samples", &latencies)),
        (THROUGHPUT, line_chart("Throughput (req/s)", "req/s", "seconds", &throughput)),
        (ERROR_RATE, line_chart("Error Rate (%)", "%", "windows", &error_rate)),
    ];

    let mut written = Vec::with_capacity(graphs.len());
    for (name, canvas) in graphs {
        let path = out_dir.join(name);
        canvas.save(&path)?;
        written.push(path);
    }

    info!(dir = %out_dir.display(), samples = table.len(), "JMeter graphs written");
    Ok(written)
}
