//! Response bodies of failed JMeter samples

use crate::error::ReportResult;
use crate::extract::JtlTable;
use crate::output::{ensure_dir, write_artifact, write_json};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

pub const FAILURES_SUMMARY: &str = "failures-summary.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEntry {
    /// Zero-based sample row
    pub index: usize,
    pub file: String,
}

/// Contents of `failures-summary.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureSummary {
    pub source: String,
    pub count: usize,
    pub failures: Vec<FailureEntry>,
}

/// Write `failure_<n>.html` for every failed sample of `jtl` into `out_dir`,
/// numbered from 1 by sample row, and the summary next to them.
pub fn extract_failures(jtl: &Path, out_dir: &Path) -> ReportResult<FailureSummary> {
    let table = JtlTable::from_path(jtl)?;
    ensure_dir(out_dir)?;

    let response = table.response_column();
    if response.is_none() {
        warn!(path = %jtl.display(), "no response data column, failure files will be empty");
    }

    let failed: Vec<usize> = match table.outcomes() {
        Some(outcomes) => outcomes
            .iter()
            .enumerate()
            .filter(|(_, ok)| !**ok)
            .map(|(index, _)| index)
            .collect(),
        None => {
            warn!(path = %jtl.display(), "no success or responseCode column, no failures detectable");
            Vec::new()
        }
    };

    let mut failures = Vec::with_capacity(failed.len());
    for index in failed {
        let body = response
            .and_then(|column| table.raw_cell(index, column))
            .unwrap_or_default();
        let file = out_dir.join(format!("failure_{}.html", index + 1));
        write_artifact(&file, body)?;
        failures.push(FailureEntry {
            index,
            file: file.display().to_string(),
        });
    }

    let summary = FailureSummary {
        source: jtl.display().to_string(),
        count: failures.len(),
        failures,
    };
    write_json(&out_dir.join(FAILURES_SUMMARY), &summary)?;

    info!(count = summary.count, dir = %out_dir.display(), "failures extracted");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_failed_samples_written() {
        let dir = tempfile::tempdir().unwrap();
        let jtl = dir.path().join("run.csv");
        fs::write(
            &jtl,
            "elapsed,label,success,responseData\n\
             10,home,true,<p>ok</p>\n\
             20,login,false,<p>denied</p>\n\
             30,cart,FALSE,\n",
        )
        .unwrap();
        let out = dir.path().join("failures");

        let summary = extract_failures(&jtl, &out).unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.failures[0].index, 1);
        assert!(summary.failures[0].file.ends_with("failure_2.html"));
        assert_eq!(fs::read_to_string(out.join("failure_2.html")).unwrap(), "<p>denied</p>");
        assert_eq!(fs::read_to_string(out.join("failure_3.html")).unwrap(), "");
        assert!(!out.join("failure_1.html").exists());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(FAILURES_SUMMARY)).unwrap()).unwrap();
        assert_eq!(written["count"], 2);
        assert_eq!(written["source"], jtl.display().to_string());
    }

    #[test]
    fn test_response_code_failures_without_body_column() {
        let dir = tempfile::tempdir().unwrap();
        let jtl = dir.path().join("run.csv");
        fs::write(&jtl, "elapsed,responseCode\n5,200\n6,500\n").unwrap();

        let summary = extract_failures(&jtl, dir.path()).unwrap();
        assert_eq!(summary.count, 1);
        assert!(dir.path().join("failure_2.html").exists());
    }

    #[test]
    fn test_missing_jtl() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_failures(&dir.path().join("absent.csv"), dir.path());
        assert!(matches!(result, Err(crate::ReportError::MissingInput(_))));
    }
}
