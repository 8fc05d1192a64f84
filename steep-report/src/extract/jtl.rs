//! JMeter JTL samples in CSV form

use crate::error::{ReportError, ReportResult};
use crate::stats;
use csv::StringRecord;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// The sample rows of one JTL file, columns looked up by name
#[derive(Debug, Clone)]
pub struct JtlTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl JtlTable {
    pub fn from_path(path: &Path) -> ReportResult<Self> {
        if !path.exists() {
            return Err(ReportError::MissingInput(path.to_path_buf()));
        }
        let file = std::fs::File::open(path).map_err(|e| ReportError::io(path, "open", e))?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), samples = table.len(), "JTL loaded");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> ReportResult<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column, compared case-insensitively
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(str::trim)
    }

    fn values(&self, column: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, column).filter(|v| !v.is_empty()))
    }

    /// `elapsed`, else the first column whose values are all numeric
    pub fn latency_column(&self) -> Option<usize> {
        self.column("elapsed").or_else(|| {
            (0..self.headers.len()).find(|&column| {
                let mut cells = self.values(column).flatten().peekable();
                cells.peek().is_some() && cells.all(|v| v.parse::<f64>().is_ok())
            })
        })
    }

    /// Latency per sample in file order; unparsable cells are skipped
    pub fn latencies(&self) -> Vec<f64> {
        let Some(column) = self.latency_column() else {
            return Vec::new();
        };
        self.values(column)
            .flatten()
            .filter_map(|v| v.parse::<f64>().ok())
            .collect()
    }

    /// Success per sample: the `success` column, else the response code
    /// (2xx and 3xx succeed). `None` when neither column exists.
    pub fn outcomes(&self) -> Option<Vec<bool>> {
        if let Some(column) = self.column("success") {
            return Some(self.values(column).map(|v| v.is_some_and(parse_success)).collect());
        }
        let column = self.column("responseCode")?;
        Some(
            self.values(column)
                .map(|v| v.and_then(|code| code.parse::<u16>().ok()).is_some_and(|code| (200..400).contains(&code)))
                .collect(),
        )
    }

    /// `timeStamp` values in epoch milliseconds
    pub fn timestamps(&self) -> Vec<i64> {
        let Some(column) = self.column("timeStamp") else {
            return Vec::new();
        };
        self.values(column)
            .flatten()
            .filter_map(|v| v.parse::<i64>().ok())
            .collect()
    }

    /// Samples as `(label, elapsed, success)`; rows without a label are skipped
    pub fn labelled(&self) -> Vec<(String, Option<f64>, bool)> {
        let Some(label) = self.column("label") else {
            return Vec::new();
        };
        let elapsed = self.column("elapsed");
        let outcomes = self.outcomes();

        (0..self.rows.len())
            .filter_map(|row| {
                let name = self.cell(row, label).filter(|v| !v.is_empty())?;
                let latency = elapsed
                    .and_then(|c| self.cell(row, c))
                    .and_then(|v| v.parse::<f64>().ok());
                let ok = outcomes.as_ref().map_or(true, |o| o[row]);
                Some((name.to_string(), latency, ok))
            })
            .collect()
    }

    /// Column holding response bodies, when the file saved them
    pub fn response_column(&self) -> Option<usize> {
        self.headers.iter().position(|h| {
            let h = h.to_ascii_lowercase();
            h.contains("responsedata") || h.contains("response_data") || h == "response"
        })
    }

    /// Raw cell, untrimmed, for response bodies
    pub fn raw_cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)
    }
}

/// `true`, `t` and `1` succeed, compared case-insensitively
pub fn parse_success(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "t" | "1")
}

/// Latency and error statistics of a JTL file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSummary {
    pub samples: usize,
    pub mean: Option<f64>,
    pub p50: Option<f64>,
    pub p90: Option<f64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub error_rate: Option<f64>,
    /// Mean samples per second, empty seconds included
    pub throughput: Option<f64>,
    pub rolling_window: usize,
    #[serde(skip)]
    pub rolling_error_rate: Vec<f64>,
}

impl SampleSummary {
    pub fn from_table(table: &JtlTable, rolling_window: usize) -> Self {
        let latencies = stats::sorted(&table.latencies());
        let outcomes = table.outcomes();

        Self {
            samples: table.len(),
            mean: stats::mean(&latencies),
            p50: stats::quantile(&latencies, 0.5),
            p90: stats::quantile(&latencies, 0.9),
            p95: stats::quantile(&latencies, 0.95),
            p99: stats::quantile(&latencies, 0.99),
            min: latencies.first().copied(),
            max: latencies.last().copied(),
            error_rate: outcomes.as_deref().and_then(stats::error_rate),
            throughput: stats::throughput(&table.timestamps()),
            rolling_window,
            rolling_error_rate: outcomes
                .as_deref()
                .map(|o| stats::rolling_error_rate(o, rolling_window))
                .unwrap_or_default(),
        }
    }
}

pub fn summarize_jtl(path: &Path, rolling_window: usize) -> ReportResult<SampleSummary> {
    let table = JtlTable::from_path(path)?;
    Ok(SampleSummary::from_table(&table, rolling_window))
}
