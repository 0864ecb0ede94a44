//! Snapshot and report files on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{ReportRow, Snapshot, TrendReport, REPORT_COLUMNS};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_error(parent))
        }
        _ => Ok(()),
    }
}

/// Write bytes next to `path` and rename into place.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    ensure_parent_dir(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content).map_err(io_error(&tmp))?;
    fs::rename(&tmp, path).map_err(io_error(path))?;
    debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let mut content = serde_json::to_vec_pretty(value)?;
    content.push(b'\n');
    write_atomic(path, &content)
}

/// Persist one snapshot as pretty-printed JSON.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StorageError> {
    write_pretty_json(path, snapshot)
}

/// Persist the report envelope as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &TrendReport) -> Result<(), StorageError> {
    write_pretty_json(path, report)
}

/// Persist report rows as CSV with a header row, even when there are none.
pub fn write_report_csv(path: &Path, rows: &[ReportRow]) -> Result<(), StorageError> {
    let csv_error = |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS).map_err(csv_error)?;
    for row in rows {
        writer.write_record(csv_record(row)).map_err(csv_error)?;
    }
    let content = writer
        .into_inner()
        .map_err(|e| csv_error(csv::Error::from(e.into_error())))?;

    write_atomic(path, &content)
}

/// One CSV record; absent values become empty cells.
fn csv_record(row: &ReportRow) -> [String; 9] {
    [
        row.identity.clone().unwrap_or_default(),
        row.title.clone().unwrap_or_default(),
        row.link.clone().unwrap_or_default(),
        row.current_rank.to_string(),
        row.category_url.clone().unwrap_or_default(),
        row.days_seen.to_string(),
        row.first_seen.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        row.keywords.join(", "),
        row.idea_prompt.clone(),
    ]
}
