pub mod orders;
pub mod tickets;

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::error::AppError;

/// One dashboard run: the input file plus the outputs to produce.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub csv: PathBuf,
    pub html: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
    pub json: bool,
}

impl ReportRequest {
    pub fn new(csv: impl Into<PathBuf>) -> Self {
        ReportRequest {
            csv: csv.into(),
            ..Default::default()
        }
    }

    /// File name shown in page headers; falls back to the full path.
    pub fn source_name(&self) -> String {
        self.csv
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.csv.display().to_string())
    }

    fn writes_files(&self) -> bool {
        self.html.is_some() || self.xlsx.is_some()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: String,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

/// What a run produced: files written plus the text destined for stdout.
#[derive(Debug, Default)]
pub struct ReportOutcome {
    pub exports: Vec<ExportResult>,
    pub stdout: Option<String>,
}

/// Write `bytes` to `path` and report size and elapsed time since `start`.
pub(crate) fn write_export(path: &Path, bytes: &[u8], start: Instant) -> Result<ExportResult, AppError> {
    std::fs::write(path, bytes)?;
    let result = ExportResult {
        path: path.display().to_string(),
        size_bytes: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    log::info!(
        "Wrote {} ({} bytes, {}ms)",
        result.path,
        result.size_bytes,
        result.duration_ms
    );
    Ok(result)
}

/// Text summary is printed only when nothing else was asked for.
pub(crate) fn stdout_text<T: Serialize>(
    request: &ReportRequest,
    dashboard: &T,
    summary: impl FnOnce() -> String,
) -> Result<Option<String>, AppError> {
    if request.json {
        Ok(Some(serde_json::to_string_pretty(dashboard)?))
    } else if request.writes_files() {
        Ok(None)
    } else {
        Ok(Some(summary()))
    }
}
