//! k6 summary JSON

use crate::error::{ReportError, ReportResult};
use crate::output::read_text;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

const DURATION: &str = "http_req_duration";
const DURATION_EXPECTED: &str = "http_req_duration{expected_response:true}";
const FAILED: &str = "http_req_failed";
const REQUESTS: &str = "http_reqs";

/// Headline numbers from a k6 summary. Absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct K6Metrics {
    pub avg: Option<f64>,
    pub med: Option<f64>,
    pub max: Option<f64>,
    pub p90: Option<f64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
    /// `http_req_failed` rate
    pub failed_rate: Option<f64>,
    /// `http_reqs` per second
    pub request_rate: Option<f64>,
    /// Rate of every `checks*` metric
    pub checks: BTreeMap<String, Option<f64>>,
}

impl K6Metrics {
    /// Read the headline numbers out of a parsed summary
    pub fn from_summary(summary: &Value) -> Self {
        let Some(metrics) = summary.get("metrics").and_then(Value::as_object) else {
            return Self::default();
        };

        let duration = metrics
            .get(DURATION)
            .filter(|m| m.is_object())
            .or_else(|| metrics.get(DURATION_EXPECTED));
        let stat = |key: &str| duration.and_then(|m| metric_value(m, key));

        let checks = metrics
            .iter()
            .filter(|(name, _)| name.starts_with("checks"))
            .map(|(name, metric)| (name.clone(), rate(metric)))
            .collect();

        Self {
            avg: stat("avg"),
            med: stat("med"),
            max: stat("max"),
            p90: stat("p(90)"),
            p95: stat("p(95)"),
            p99: stat("p(99)"),
            failed_rate: metrics.get(FAILED).and_then(rate),
            request_rate: metrics.get(REQUESTS).and_then(rate),
            checks,
        }
    }

    /// `(label, value)` for p90, p95 and p99
    pub fn percentiles(&self) -> [(&'static str, Option<f64>); 3] {
        [("p90", self.p90), ("p95", self.p95), ("p99", self.p99)]
    }
}

/// `key` on the metric itself or under its `values` map
fn metric_value(metric: &Value, key: &str) -> Option<f64> {
    metric
        .get(key)
        .and_then(Value::as_f64)
        .or_else(|| metric.get("values").and_then(|v| v.get(key)).and_then(Value::as_f64))
}

fn rate(metric: &Value) -> Option<f64> {
    metric_value(metric, "rate").or_else(|| metric_value(metric, "value"))
}

/// Parse a summary file; unreadable or non-JSON content is an error
pub fn load_k6_summary(path: &Path) -> ReportResult<Value> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_k6_metrics(path: &Path) -> ReportResult<K6Metrics> {
    load_k6_summary(path).map(|summary| K6Metrics::from_summary(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_metric_values() {
        let summary = json!({"metrics": {"http_req_duration": {"avg": 120.5, "p(90)": 200, "p(95)": 250}}});
        let metrics = K6Metrics::from_summary(&summary);
        assert_eq!(metrics.avg, Some(120.5));
        assert_eq!(metrics.p90, Some(200.0));
        assert_eq!(metrics.p95, Some(250.0));
        assert_eq!(metrics.p99, None);
        assert_eq!(metrics.med, None);
    }

    #[test]
    fn test_nested_values_and_rates() {
        let summary = json!({"metrics": {
            "http_req_duration{expected_response:true}": {"values": {"avg": 80.0, "med": 70.0, "max": 300.0}},
            "http_req_failed": {"values": {"rate": 0.02}},
            "http_reqs": {"count": 100, "rate": 12.5},
            "checks": {"passes": 9, "fails": 1, "value": 0.9},
            "checks{scenario:login}": {"values": {"rate": 1.0}},
            "vus": {"value": 10}
        }});
        let metrics = K6Metrics::from_summary(&summary);
        assert_eq!(metrics.avg, Some(80.0));
        assert_eq!(metrics.med, Some(70.0));
        assert_eq!(metrics.max, Some(300.0));
        assert_eq!(metrics.failed_rate, Some(0.02));
        assert_eq!(metrics.request_rate, Some(12.5));
        assert_eq!(metrics.checks.len(), 2);
        assert_eq!(metrics.checks["checks"], Some(0.9));
        assert_eq!(metrics.checks["checks{scenario:login}"], Some(1.0));
    }

    #[test]
    fn test_missing_keys_are_null() {
        for summary in [json!({}), json!({"metrics": {}}), json!([1, 2]), json!({"metrics": {"http_req_duration": 5}})] {
            let metrics = K6Metrics::from_summary(&summary);
            assert_eq!(metrics, K6Metrics::default());
        }

        let json = serde_json::to_value(K6Metrics::default()).unwrap();
        assert!(json["avg"].is_null());
        assert!(json["p99"].is_null());
    }
}
