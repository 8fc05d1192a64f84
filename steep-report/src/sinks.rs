//! Output renderers compiled into this build

use crate::error::{ReportError, ReportResult};
use serde::Serialize;
use tracing::warn;

/// Which optional renderers are available, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SinkSet {
    pub charts: bool,
    pub pdf: bool,
}

impl SinkSet {
    /// Everything the enabled cargo features provide
    pub fn available() -> Self {
        Self {
            charts: cfg!(feature = "charts"),
            pdf: cfg!(feature = "pdf"),
        }
    }

    /// HTML and JSON only
    pub fn none() -> Self {
        Self {
            charts: false,
            pdf: false,
        }
    }

    pub fn without_pdf(self) -> Self {
        Self { pdf: false, ..self }
    }

    /// `Ok` when charts can be drawn, otherwise a warning and `Unsupported`
    pub fn require_charts(&self) -> ReportResult<()> {
        if self.charts {
            return Ok(());
        }
        warn!("PNG charts are not available in this build, skipping");
        Err(ReportError::Unsupported("chart"))
    }

    pub fn require_pdf(&self) -> ReportResult<()> {
        if self.pdf {
            return Ok(());
        }
        warn!("PDF output is not available in this build, skipping");
        Err(ReportError::Unsupported("PDF"))
    }
}

impl Default for SinkSet {
    fn default() -> Self {
        Self::available()
    }
}
