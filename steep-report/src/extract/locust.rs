//! Locust HTML reports

use crate::error::{ReportError, ReportResult};
use crate::output::read_text;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use steep_scrape::{embedded_object, first_heading, first_table, EmbeddedMarker};

/// Title and first statistics table of a Locust report
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocustPreview {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// First data row keyed by header
    pub table_first_row: Option<BTreeMap<String, String>>,
}

impl LocustPreview {
    pub fn from_markup(markup: &str, container: Option<&str>, max_rows: usize) -> ReportResult<Self> {
        let title = first_heading(markup).unwrap_or_else(|| "Locust report".to_string());
        let table = first_table(markup, container, max_rows)?.unwrap_or_default();

        Ok(Self {
            title,
            table_first_row: table.first_row_map(),
            headers: table.headers,
            rows: table.rows,
        })
    }

    /// Average response time from the first row's `Avg` column
    pub fn average_ms(&self) -> Option<f64> {
        let row = self.table_first_row.as_ref()?;
        row.get("Avg")
            .or_else(|| {
                row.iter()
                    .find(|(header, _)| {
                        let header = header.to_ascii_lowercase();
                        header.starts_with("avg") || header.starts_with("average")
                    })
                    .map(|(_, value)| value)
            })
            .and_then(|value| value.trim().parse::<f64>().ok())
    }
}

pub fn read_locust_preview(path: &Path, max_rows: usize) -> ReportResult<LocustPreview> {
    let markup = read_text(path)?;
    LocustPreview::from_markup(&markup, None, max_rows)
}

/// Aggregated numbers from the statistics object Locust embeds in its report
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocustStats {
    pub avg_response_time: Option<f64>,
    pub min_response_time: Option<f64>,
    pub max_response_time: Option<f64>,
    pub total_rps: Option<f64>,
    pub total_fail_per_sec: Option<f64>,
    pub num_requests: Option<u64>,
    pub num_failures: Option<u64>,
    /// Every `*percentile*` key of the `Aggregated` response-time entry
    pub percentiles: BTreeMap<String, Value>,
}

impl LocustStats {
    /// The last `requestsStatistics` entry is the aggregated row
    pub fn from_object(data: &Value) -> ReportResult<Self> {
        let total = data
            .get("requestsStatistics")
            .and_then(Value::as_array)
            .and_then(|rows| rows.last())
            .ok_or_else(|| ReportError::NoData("requestsStatistics is missing or empty".to_string()))?;

        let number = |key: &str| total.get(key).and_then(Value::as_f64);
        let count = |key: &str| total.get(key).and_then(Value::as_u64);

        let percentiles = data
            .get("responseTimeStatistics")
            .and_then(Value::as_array)
            .and_then(|stats| {
                stats
                    .iter()
                    .find(|stat| stat.get("name").and_then(Value::as_str) == Some("Aggregated"))
            })
            .and_then(Value::as_object)
            .map(|aggregated| {
                aggregated
                    .iter()
                    .filter(|(key, _)| key.to_ascii_lowercase().contains("percentile"))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            avg_response_time: number("avgResponseTime"),
            min_response_time: number("minResponseTime"),
            max_response_time: number("maxResponseTime"),
            total_rps: number("totalRps"),
            total_fail_per_sec: number("totalFailPerSec"),
            num_requests: count("numRequests"),
            num_failures: count("numFailures"),
            percentiles,
        })
    }

    pub fn from_markup(markup: &str) -> ReportResult<Self> {
        let data = embedded_object(
            markup,
            &[EmbeddedMarker::LOCUST_CONST, EmbeddedMarker::LOCUST_TEMPLATE_ARGS],
        )?;
        Self::from_object(&data)
    }
}

pub fn read_locust_stats(path: &Path) -> ReportResult<LocustStats> {
    let markup = read_text(path)?;
    LocustStats::from_markup(&markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<html><head><title>Locust</title></head><body>
<h1> Locust Test Report </h1>
<table class="stats">
  <thead><tr><th>Type</th><th>Name</th><th>Requests</th><th>Avg</th></tr></thead>
  <tbody>
    <tr><td>GET</td><td>/login</td><td>10</td><td>42.5</td></tr>
    <tr><td>POST</td><td>/loginAction</td><td>10</td><td>80</td></tr>
    <tr><td></td><td>Aggregated</td><td>20</td><td>61.25</td></tr>
  </tbody>
</table>
<script>
  const V = {"requestsStatistics": [
      {"name": "/login", "avgResponseTime": 42.5, "numRequests": 10},
      {"name": "Aggregated", "avgResponseTime": 61.25, "minResponseTime": 3, "maxResponseTime": 410,
       "totalRps": 4.5, "totalFailPerSec": 0.25, "numRequests": 20, "numFailures": 1}],
    "responseTimeStatistics": [
      {"name": "/login", "0.95 percentile": 90},
      {"name": "Aggregated", "0.5 percentile": 55, "0.95 percentile": 180, "0.99 Percentile": 400}]};
</script></body></html>"#;

    #[test]
    fn test_preview() {
        let preview = LocustPreview::from_markup(REPORT, None, 2).unwrap();
        assert_eq!(preview.title, "Locust Test Report");
        assert_eq!(preview.headers, vec!["Type", "Name", "Requests", "Avg"]);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.table_first_row.as_ref().unwrap()["Name"], "/login");
        assert_eq!(preview.average_ms(), Some(42.5));
    }

    #[test]
    fn test_preview_without_table() {
        let preview = LocustPreview::from_markup("<html><body><p>nothing</p></body></html>", None, 5).unwrap();
        assert_eq!(preview.title, "Locust report");
        assert!(preview.table_first_row.is_none());
        assert_eq!(preview.average_ms(), None);
    }

    #[test]
    fn test_average_column_variants() {
        let preview = LocustPreview {
            table_first_row: Some(BTreeMap::from([("Average (ms)".to_string(), "12".to_string())])),
            ..LocustPreview::default()
        };
        assert_eq!(preview.average_ms(), Some(12.0));
    }

    #[test]
    fn test_embedded_stats() {
        let stats = LocustStats::from_markup(REPORT).unwrap();
        assert_eq!(stats.avg_response_time, Some(61.25));
        assert_eq!(stats.min_response_time, Some(3.0));
        assert_eq!(stats.total_rps, Some(4.5));
        assert_eq!(stats.num_requests, Some(20));
        assert_eq!(stats.num_failures, Some(1));
        assert_eq!(stats.percentiles.len(), 3);
        assert_eq!(stats.percentiles["0.95 percentile"], 180);
    }

    #[test]
    fn test_template_args_marker() {
        let markup = r#"<script>window.templateArgs = {"requestsStatistics": [{"totalRps": 2.0}]};</script>"#;
        let stats = LocustStats::from_markup(markup).unwrap();
        assert_eq!(stats.total_rps, Some(2.0));
        assert!(stats.percentiles.is_empty());
    }

    #[test]
    fn test_missing_object() {
        assert!(LocustStats::from_markup("<html></html>").is_err());
        let err = LocustStats::from_object(&serde_json::json!({"requestsStatistics": []})).unwrap_err();
        assert!(matches!(err, ReportError::NoData(_)));
    }
}
