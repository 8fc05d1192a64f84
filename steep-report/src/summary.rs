//! Unified `{k6, locust, jmeter}` summary

use crate::error::ReportResult;
use crate::extract::{JmeterPreview, K6Metrics, LocustPreview, SampleSummary};
use crate::output::write_json;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// JMeter dashboard preview plus JTL statistics, either may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JmeterSummary {
    pub report: Option<JmeterPreview>,
    pub samples: Option<SampleSummary>,
}

impl JmeterSummary {
    fn into_option(self) -> Option<Self> {
        (self.report.is_some() || self.samples.is_some()).then_some(self)
    }
}

/// Everything extracted from one set of artifacts. Contains no timestamps,
/// so identical inputs serialize to identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnifiedSummary {
    pub k6: Option<K6Metrics>,
    pub locust: Option<LocustPreview>,
    pub jmeter: Option<JmeterSummary>,
}

impl UnifiedSummary {
    pub fn new(
        k6: Option<K6Metrics>,
        locust: Option<LocustPreview>,
        jmeter_report: Option<JmeterPreview>,
        jtl: Option<SampleSummary>,
    ) -> Self {
        let jmeter = JmeterSummary {
            report: jmeter_report,
            samples: jtl,
        };
        Self {
            k6,
            locust,
            jmeter: jmeter.into_option(),
        }
    }

    pub fn write(&self, path: &Path) -> ReportResult<()> {
        write_json(path, self)?;
        info!(path = %path.display(), "unified summary written");
        Ok(())
    }
}
