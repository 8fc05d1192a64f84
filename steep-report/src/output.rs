//! Reading inputs and writing artifacts on the filesystem

use crate::error::{ReportError, ReportResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a whole input file; a missing file is [`ReportError::MissingInput`]
pub fn read_text(path: &Path) -> ReportResult<String> {
    if !path.exists() {
        return Err(ReportError::MissingInput(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| ReportError::io(path, "read", e))
}

/// Write `contents` to `path`, creating parent directories
pub fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> ReportResult<()> {
    ensure_parent(path)?;
    let contents = contents.as_ref();
    fs::write(path, contents).map_err(|e| ReportError::io(path, "write", e))?;
    debug!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(())
}

pub fn ensure_dir(dir: &Path) -> ReportResult<()> {
    fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, "create directory", e))
}

pub(crate) fn ensure_parent(path: &Path) -> ReportResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Pretty JSON with a trailing newline
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> ReportResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    write_artifact(path, bytes)
}
