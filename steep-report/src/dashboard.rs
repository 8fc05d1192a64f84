//! Combined k6 / Locust / JMeter dashboard
//!
//! Every artifact is optional. A section whose input is missing or unreadable
//! is rendered as "N/A" and logged, and the remaining sections still render.

use crate::error::ReportResult;
use crate::extract::{
    read_jmeter_report, read_k6_metrics, read_locust_preview, summarize_jtl, JmeterPreview, K6Metrics,
    LocustPreview, SampleSummary,
};
use crate::output::write_artifact;
use crate::sinks::SinkSet;
use crate::summary::UnifiedSummary;
use crate::template::ReportTemplates;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use steep_config::ReportConfig;
use tracing::{info, warn};

const NOT_AVAILABLE: &str = "N/A";

/// Extracted sections, `None` where the artifact could not be used
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub k6: Option<K6Metrics>,
    pub locust: Option<LocustPreview>,
    pub jmeter: Option<JmeterPreview>,
    pub jtl: Option<SampleSummary>,
}

/// Chart files to embed, as written or relative to the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartRefs {
    pub heatmap: Option<PathBuf>,
    pub compare: Option<PathBuf>,
}

impl ChartRefs {
    pub fn files(&self) -> Vec<PathBuf> {
        self.heatmap.iter().chain(self.compare.iter()).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// What a dashboard run produced
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOutcome {
    pub html: PathBuf,
    pub charts: Vec<PathBuf>,
    pub pdf: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    /// Sections with data, out of k6, Locust, JMeter and JTL
    pub sections: usize,
}

fn optional<T>(section: &str, result: ReportResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(section, "{}: section unavailable", e);
            None
        }
    }
}

impl Dashboard {
    pub fn collect(config: &ReportConfig) -> Self {
        Self {
            k6: optional("k6", read_k6_metrics(&config.k6_summary)),
            locust: optional("locust", read_locust_preview(&config.locust_report, config.preview_rows)),
            jmeter: optional("jmeter", read_jmeter_report(&config.jmeter_dir)),
            jtl: config
                .jtl
                .as_deref()
                .and_then(|path| optional("jtl", summarize_jtl(path, config.rolling_window))),
        }
    }

    pub fn sections(&self) -> usize {
        [self.k6.is_some(), self.locust.is_some(), self.jmeter.is_some(), self.jtl.is_some()]
            .into_iter()
            .filter(|present| *present)
            .count()
    }

    pub fn summary(&self) -> UnifiedSummary {
        UnifiedSummary::new(self.k6.clone(), self.locust.clone(), self.jmeter.clone(), self.jtl.clone())
    }

    fn jmeter_stat(&self, title: &str) -> Option<f64> {
        self.jmeter
            .as_ref()?
            .statistics
            .as_ref()?
            .get(title)
            .and_then(Value::as_f64)
    }

    /// Average latency per tool that reports one
    pub fn averages(&self) -> Vec<(String, f64)> {
        let candidates = [
            ("k6", self.k6.as_ref().and_then(|m| m.avg)),
            ("locust", self.locust.as_ref().and_then(LocustPreview::average_ms)),
            ("jmeter", self.jmeter_stat("Average")),
            ("jtl", self.jtl.as_ref().and_then(|s| s.mean)),
        ];
        candidates
            .into_iter()
            .filter_map(|(tool, avg)| avg.map(|v| (tool.to_string(), v)))
            .collect()
    }

    /// p90, p95 and p99 per tool; a tool without a section is left out
    pub fn percentile_rows(&self) -> Vec<(String, [Option<f64>; 3])> {
        let mut rows = Vec::new();
        if let Some(k6) = &self.k6 {
            rows.push(("k6".to_string(), [k6.p90, k6.p95, k6.p99]));
        }
        if let Some(locust) = &self.locust {
            rows.push(("locust".to_string(), ["90%", "95%", "99%"].map(|p| locust_percentile(locust, p))));
        }
        if self.jmeter.is_some() {
            rows.push((
                "jmeter".to_string(),
                ["90th pct", "95th pct", "99th pct"].map(|title| self.jmeter_stat(title)),
            ));
        }
        if let Some(jtl) = &self.jtl {
            rows.push(("jtl".to_string(), [jtl.p90, jtl.p95, jtl.p99]));
        }
        rows
    }

    pub fn render_html(
        &self,
        templates: &ReportTemplates,
        charts: &ChartRefs,
        links: &[Link],
        generated_at: &str,
    ) -> ReportResult<String> {
        let view = DashboardView {
            title: "Load test dashboard: TeaStore",
            generated_at,
            heatmap: charts.heatmap.as_deref().map(href),
            compare: charts.compare.as_deref().map(href),
            k6: self.k6.as_ref().map(K6View::new),
            locust: self.locust.as_ref(),
            jmeter: self.jmeter.as_ref().map(JmeterView::new),
            jtl: self.jtl.as_ref().map(JtlView::new),
            k6_json: pretty(&self.k6)?,
            locust_json: pretty(&self.locust.as_ref().map(|l| &l.table_first_row))?,
            jmeter_json: pretty(&self.jmeter)?,
            links,
        };
        templates.render(ReportTemplates::DASHBOARD, &view)
    }

    #[cfg(feature = "charts")]
    fn draw_charts(&self, dir: &Path) -> ReportResult<ChartRefs> {
        use crate::chart;

        Ok(ChartRefs {
            compare: chart::write_compare_avg(dir, &self.averages())?,
            heatmap: Some(chart::write_heatmap(dir, &self.percentile_rows())?),
        })
    }

    #[cfg(not(feature = "charts"))]
    fn draw_charts(&self, _dir: &Path) -> ReportResult<ChartRefs> {
        Err(crate::error::ReportError::Unsupported("chart"))
    }

    /// Same content as the HTML page: k6 numbers, charts, the Locust first
    /// row and where the JMeter report lives
    #[cfg(feature = "pdf")]
    pub fn to_pdf(&self, charts: &ChartRefs) -> ReportResult<crate::pdf::PdfDocument> {
        let mut doc = crate::pdf::PdfDocument::new();
        doc.title("Load test dashboard: TeaStore").spacer(8.0);

        doc.heading("k6");
        match &self.k6 {
            Some(k6) => doc.code(&serde_json::to_string_pretty(k6)?),
            None => doc.paragraph(NOT_AVAILABLE),
        };

        for chart in charts.files() {
            let image = image::open(&chart)?.to_rgb8();
            let (width, height) = (image.width() as f64, image.height() as f64);
            let scale = (480.0 / width).min(1.0);
            doc.spacer(8.0).image(&image, width * scale, height * scale)?;
        }

        doc.heading("Locust");
        match self.locust.as_ref().and_then(|l| l.table_first_row.as_ref()) {
            Some(row) => {
                let headers: Vec<String> = row.keys().cloned().collect();
                let values: Vec<String> = row.values().cloned().collect();
                doc.table(&headers, &[values])
            }
            None => doc.paragraph(NOT_AVAILABLE),
        };

        doc.heading("JMeter");
        match &self.jmeter {
            Some(jmeter) => doc.paragraph(&format!("Report: {}", jmeter.index.display())),
            None => doc.paragraph(NOT_AVAILABLE),
        };
        if let Some(jtl) = &self.jtl {
            let view = JtlView::new(jtl);
            doc.table(
                &["samples", "mean", "p50", "p95", "p99", "errors", "req/s"].map(String::from),
                &[vec![
                    view.samples.to_string(),
                    view.mean,
                    view.p50,
                    view.p95,
                    view.p99,
                    view.error_rate,
                    view.throughput,
                ]],
            );
        }

        Ok(doc)
    }

    #[cfg(not(feature = "pdf"))]
    fn write_pdf(&self, _path: &Path, _charts: &ChartRefs) -> ReportResult<()> {
        Err(crate::error::ReportError::Unsupported("PDF"))
    }

    #[cfg(feature = "pdf")]
    fn write_pdf(&self, path: &Path, charts: &ChartRefs) -> ReportResult<()> {
        self.to_pdf(charts)?.save(path)
    }
}

/// Percentile column of the Locust first row, e.g. `90%` matches `90%ile`
fn locust_percentile(locust: &LocustPreview, marker: &str) -> Option<f64> {
    let row = locust.table_first_row.as_ref()?;
    row.iter()
        .find(|(header, _)| header.contains(marker))
        .and_then(|(_, value)| value.trim().parse::<f64>().ok())
}

/// Number for display, at most three decimals
pub fn display_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}", (v * 1000.0).round() / 1000.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => display_number(n.as_f64()),
        Value::Null => NOT_AVAILABLE.to_string(),
        other => other.to_string(),
    }
}

fn pretty<T: Serialize>(value: &T) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn href(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn absolute(path: &Path) -> Option<PathBuf> {
    let path = if path.as_os_str().is_empty() { Path::new(".") } else { path };
    std::path::absolute(path).ok()
}

/// `path` as referenced from a page in directory `base`, stepping out with
/// `..` where needed; unchanged when no relative form exists
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    absolute(path)
        .zip(absolute(base))
        .and_then(|(path, base)| pathdiff::diff_paths(path, base))
        .unwrap_or_else(|| path.to_path_buf())
}

#[derive(Serialize)]
struct DashboardView<'a> {
    title: &'a str,
    generated_at: &'a str,
    heatmap: Option<String>,
    compare: Option<String>,
    k6: Option<K6View>,
    locust: Option<&'a LocustPreview>,
    jmeter: Option<JmeterView>,
    jtl: Option<JtlView>,
    k6_json: String,
    locust_json: String,
    jmeter_json: String,
    links: &'a [Link],
}

#[derive(Serialize)]
struct CheckView {
    name: String,
    rate: String,
}

#[derive(Serialize)]
struct K6View {
    avg: String,
    med: String,
    max: String,
    p90: String,
    p95: String,
    p99: String,
    failed_rate: String,
    request_rate: String,
    checks: Vec<CheckView>,
}

impl K6View {
    fn new(k6: &K6Metrics) -> Self {
        Self {
            avg: display_number(k6.avg),
            med: display_number(k6.med),
            max: display_number(k6.max),
            p90: display_number(k6.p90),
            p95: display_number(k6.p95),
            p99: display_number(k6.p99),
            failed_rate: display_number(k6.failed_rate),
            request_rate: display_number(k6.request_rate),
            checks: k6
                .checks
                .iter()
                .map(|(name, rate)| CheckView {
                    name: name.clone(),
                    rate: display_number(*rate),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct StatisticView {
    title: String,
    value: String,
}

#[derive(Serialize)]
struct JmeterView {
    ok_percent: String,
    ko_percent: String,
    statistics: Vec<StatisticView>,
}

impl JmeterView {
    fn new(jmeter: &JmeterPreview) -> Self {
        let statistics = jmeter
            .statistics
            .as_ref()
            .map(|stats| {
                stats
                    .titles
                    .iter()
                    .zip(stats.overall.iter())
                    .map(|(title, value)| StatisticView {
                        title: title.clone(),
                        value: display_value(value),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            ok_percent: display_number(jmeter.ok_percent),
            ko_percent: display_number(jmeter.ko_percent),
            statistics,
        }
    }
}

#[derive(Serialize)]
struct JtlView {
    samples: usize,
    mean: String,
    p50: String,
    p95: String,
    p99: String,
    error_rate: String,
    throughput: String,
}

impl JtlView {
    fn new(jtl: &SampleSummary) -> Self {
        Self {
            samples: jtl.samples,
            mean: display_number(jtl.mean),
            p50: display_number(jtl.p50),
            p95: display_number(jtl.p95),
            p99: display_number(jtl.p99),
            error_rate: display_number(jtl.error_rate),
            throughput: display_number(jtl.throughput),
        }
    }
}

/// Links to the source reports that exist, relative to `base`
pub fn source_links(config: &ReportConfig, base: &Path) -> Vec<Link> {
    let mut candidates = vec![
        (config.k6_summary.clone(), "k6 summary JSON"),
        (config.locust_report.clone(), "Locust HTML report"),
        (config.jmeter_dir.join("index.html"), "JMeter HTML report"),
    ];
    if let Some(jtl) = &config.jtl {
        candidates.push((jtl.clone(), "JMeter JTL samples"));
    }

    candidates
        .into_iter()
        .filter(|(path, _)| path.exists())
        .map(|(path, text)| Link {
            href: href(&relative_to(&path, base)),
            text: text.to_string(),
        })
        .collect()
}

/// Read every configured artifact and write the dashboard HTML, plus the
/// charts, PDF and unified summary the sinks and config allow
pub fn build_dashboard(config: &ReportConfig, sinks: SinkSet) -> ReportResult<DashboardOutcome> {
    let dashboard = Dashboard::collect(config);
    let templates = ReportTemplates::new()?;
    let base = config.output.parent().unwrap_or_else(|| Path::new(""));

    let charts = match sinks.require_charts() {
        Ok(()) => dashboard.draw_charts(&config.charts_dir).unwrap_or_else(|e| {
            warn!("charts not written: {}", e);
            ChartRefs::default()
        }),
        Err(_) => ChartRefs::default(),
    };
    let embedded = ChartRefs {
        heatmap: charts.heatmap.as_deref().map(|p| relative_to(p, base)),
        compare: charts.compare.as_deref().map(|p| relative_to(p, base)),
    };

    let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let html = dashboard.render_html(&templates, &embedded, &source_links(config, base), &generated_at)?;
    write_artifact(&config.output, html)?;
    info!(path = %config.output.display(), sections = dashboard.sections(), "dashboard written");

    let summary = match &config.summary {
        Some(path) => {
            dashboard.summary().write(path)?;
            Some(path.clone())
        }
        None => None,
    };

    let pdf = match &config.pdf {
        Some(path) if sinks.require_pdf().is_ok() => match dashboard.write_pdf(path, &charts) {
            Ok(()) => {
                info!(path = %path.display(), "dashboard PDF written");
                Some(path.clone())
            }
            Err(e) => {
                warn!("dashboard PDF not written: {}", e);
                None
            }
        },
        _ => None,
    };

    Ok(DashboardOutcome {
        html: config.output.clone(),
        charts: charts.files(),
        pdf,
        summary,
        sections: dashboard.sections(),
    })
}
