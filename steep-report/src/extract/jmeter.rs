//! JMeter HTML dashboards

use crate::error::{ReportError, ReportResult};
use crate::output::read_text;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use steep_scrape::{embedded_object, EmbeddedMarker};
use tracing::warn;

const DASHBOARD_JS: &str = "content/js/dashboard.js";

/// The `statisticsTable` overall row, by column title
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JmeterStatistics {
    pub titles: Vec<String>,
    pub overall: Vec<Value>,
}

impl JmeterStatistics {
    pub fn from_object(table: &Value) -> ReportResult<Self> {
        let titles = table
            .get("titles")
            .and_then(Value::as_array)
            .ok_or_else(|| ReportError::NoData("statisticsTable has no titles".to_string()))?
            .iter()
            .map(|t| t.as_str().map(str::to_string).unwrap_or_else(|| t.to_string()))
            .collect();
        let overall = table
            .pointer("/overall/data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(Self { titles, overall })
    }

    /// Overall row zipped with the titles
    pub fn overall_map(&self) -> BTreeMap<String, Value> {
        self.titles
            .iter()
            .cloned()
            .zip(self.overall.iter().cloned())
            .collect()
    }

    pub fn get(&self, title: &str) -> Option<&Value> {
        let index = self.titles.iter().position(|t| t.eq_ignore_ascii_case(title))?;
        self.overall.get(index)
    }
}

/// Where a JMeter report lives and what its dashboard script exposes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JmeterPreview {
    pub index: PathBuf,
    pub ok_percent: Option<f64>,
    pub ko_percent: Option<f64>,
    pub statistics: Option<JmeterStatistics>,
}

impl JmeterPreview {
    /// Fill in the statistics from a `dashboard.js` source
    pub fn with_dashboard_js(mut self, source: &str) -> Self {
        match embedded_object(source, &[EmbeddedMarker::JMETER_OK_KO]) {
            Ok(ok_ko) => {
                self.ok_percent = ok_ko.get("OkPercent").and_then(Value::as_f64);
                self.ko_percent = ok_ko.get("KoPercent").and_then(Value::as_f64);
            }
            Err(e) => warn!("JMeter OK/KO split unavailable: {}", e),
        }

        match embedded_object(source, &[EmbeddedMarker::JMETER_STATISTICS])
            .map_err(ReportError::from)
            .and_then(|table| JmeterStatistics::from_object(&table))
        {
            Ok(statistics) => self.statistics = Some(statistics),
            Err(e) => warn!("JMeter statistics table unavailable: {}", e),
        }

        self
    }
}

/// Preview of a report directory; `index.html` must exist, the dashboard
/// script is optional.
pub fn read_jmeter_report(dir: &Path) -> ReportResult<JmeterPreview> {
    let index = dir.join("index.html");
    if !index.exists() {
        return Err(ReportError::MissingInput(index));
    }

    let preview = JmeterPreview {
        index,
        ..JmeterPreview::default()
    };

    match read_text(&dir.join(DASHBOARD_JS)) {
        Ok(source) => Ok(preview.with_dashboard_js(&source)),
        Err(e) => {
            warn!("JMeter dashboard script unavailable: {}", e);
            Ok(preview)
        }
    }
}
