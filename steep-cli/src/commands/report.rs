//! `steep report` subcommands

use crate::cli::{DashboardArgs, ReportCommands};
use crate::status;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use steep_config::validation::Validatable;
use steep_config::SteepConfig;
use steep_report::{build_dashboard, extract_failures, read_locust_stats, write_apdex_report, SinkSet};
use tracing::info;

pub fn handle_report(command: &ReportCommands, config: &mut SteepConfig) -> Result<()> {
    match command {
        ReportCommands::Dashboard(args) => dashboard(args, config),
        ReportCommands::K6Pdf { json, pdf } => k6_pdf(json, pdf),
        ReportCommands::LocustPdf { html, pdf } => locust_pdf(html, pdf),
        ReportCommands::JmeterPdf { graphs_dir, pdf } => jmeter_pdf(graphs_dir, pdf),
        ReportCommands::JmeterGraphs { jtl, out_dir, window } => {
            jmeter_graphs(jtl, out_dir, window.unwrap_or(config.report.rolling_window))
        }
        ReportCommands::JmeterFailures { jtl, out_dir } => {
            let summary = extract_failures(jtl, out_dir)
                .with_context(|| format!("Failed to extract failures from {}", jtl.display()))?;
            status::ok(&format!(
                "Extracted {} failures to {}",
                summary.count,
                out_dir.display()
            ));
            Ok(())
        }
        ReportCommands::JmeterApdex {
            jtl,
            output,
            labels,
            satisfied_ms,
            tolerated_ms,
        } => {
            let mut apdex = config.report.apdex.clone();
            if !labels.is_empty() {
                apdex.labels = labels.clone();
            }
            if let Some(ms) = satisfied_ms {
                apdex.satisfied_ms = *ms;
            }
            if let Some(ms) = tolerated_ms {
                apdex.tolerated_ms = *ms;
            }
            apdex.validate().context("Invalid Apdex thresholds")?;

            let report = write_apdex_report(jtl, output, &apdex)
                .with_context(|| format!("Failed to build Apdex report from {}", jtl.display()))?;
            status::ok(&format!(
                "Apdex report for {} labels ({} requests, {}% failed) at {}",
                report.labels.len(),
                report.total,
                report.fail_percent,
                output.display()
            ));
            Ok(())
        }
        ReportCommands::LocustStats { html } => locust_stats(html),
    }
}

fn dashboard(args: &DashboardArgs, config: &mut SteepConfig) -> Result<()> {
    args.apply(config);
    config.report.validate().context("Invalid report configuration")?;

    let sinks = SinkSet::available();
    info!(charts = sinks.charts, pdf = sinks.pdf, "rendering dashboard");
    let outcome = build_dashboard(&config.report, sinks).context("Failed to build dashboard")?;

    status::ok(&format!(
        "Dashboard generated at {} ({} of 4 sections)",
        outcome.html.display(),
        outcome.sections
    ));
    for chart in &outcome.charts {
        status::detail(&format!("chart {}", chart.display()));
    }
    if let Some(pdf) = &outcome.pdf {
        status::detail(&format!("PDF {}", pdf.display()));
    }
    if let Some(summary) = &outcome.summary {
        status::detail(&format!("summary {}", summary.display()));
    }
    Ok(())
}

#[cfg(feature = "pdf")]
fn k6_pdf(json: &Path, pdf: &Path) -> Result<()> {
    steep_report::k6_pdf(json, pdf).with_context(|| format!("Failed to render {}", json.display()))?;
    status::ok(&format!("k6 PDF generated at {}", pdf.display()));
    Ok(())
}

#[cfg(feature = "pdf")]
fn locust_pdf(html: &Path, pdf: &Path) -> Result<()> {
    steep_report::locust_pdf(html, pdf).with_context(|| format!("Failed to render {}", html.display()))?;
    status::ok(&format!("Locust PDF generated at {}", pdf.display()));
    Ok(())
}

#[cfg(feature = "pdf")]
fn jmeter_pdf(graphs_dir: &Path, pdf: &Path) -> Result<()> {
    steep_report::jmeter_pdf(graphs_dir, pdf)
        .with_context(|| format!("Failed to render graphs in {}", graphs_dir.display()))?;
    status::ok(&format!("JMeter PDF generated at {}", pdf.display()));
    Ok(())
}

#[cfg(not(feature = "pdf"))]
fn k6_pdf(_json: &Path, _pdf: &Path) -> Result<()> {
    Err(anyhow::anyhow!("PDF output not available. Build with --features=pdf"))
}

#[cfg(not(feature = "pdf"))]
fn locust_pdf(_html: &Path, _pdf: &Path) -> Result<()> {
    Err(anyhow::anyhow!("PDF output not available. Build with --features=pdf"))
}

#[cfg(not(feature = "pdf"))]
fn jmeter_pdf(_graphs_dir: &Path, _pdf: &Path) -> Result<()> {
    Err(anyhow::anyhow!("PDF output not available. Build with --features=pdf"))
}

#[cfg(feature = "charts")]
fn jmeter_graphs(jtl: &Path, out_dir: &Path, window: usize) -> Result<()> {
    let written = steep_report::write_jmeter_graphs(jtl, out_dir, window)
        .with_context(|| format!("Failed to draw graphs from {}", jtl.display()))?;
    status::ok(&format!("{} graphs written to {}", written.len(), out_dir.display()));
    Ok(())
}

#[cfg(not(feature = "charts"))]
fn jmeter_graphs(_jtl: &Path, _out_dir: &Path, _window: usize) -> Result<()> {
    Err(anyhow::anyhow!("Charts not available. Build with --features=charts"))
}

/// Statistics per file; a file without them is reported and skipped
fn locust_stats(files: &[PathBuf]) -> Result<()> {
    let mut unreadable = 0;
    for path in files {
        println!("FILE: {}", path.display());
        match read_locust_stats(path) {
            Ok(stats) => println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?
            ),
            Err(e) => {
                status::failed(&format!("{}: {}", path.display(), e));
                unreadable += 1;
            }
        }
    }

    if unreadable > 0 {
        return Err(anyhow::anyhow!("{} of {} reports had no statistics", unreadable, files.len()));
    }
    Ok(())
}
