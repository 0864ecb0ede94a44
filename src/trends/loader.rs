//! Snapshot loading from a data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Snapshot, SnapshotFile};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read snapshot directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load every snapshot captured within the last `window_days`, oldest first.
///
/// A file's capture time is its `scraped_at` field, or its modification
/// time when that field is missing or unparseable. Files that cannot be
/// read or parsed are skipped with a warning. A missing directory yields
/// no snapshots. Snapshots with equal capture times keep file-name order.
pub fn load_snapshots(dir: &Path, window_days: u32) -> Result<Vec<Snapshot>, LoadError> {
    load_snapshots_at(dir, window_days, Utc::now())
}

/// `load_snapshots` with an explicit "now".
pub fn load_snapshots_at(
    dir: &Path,
    window_days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<Snapshot>, LoadError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Snapshot directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let cutoff = window_cutoff(now, window_days);
    let mut snapshots = Vec::new();
    for path in paths {
        match read_snapshot(&path) {
            Some(snapshot) if snapshot.captured_at >= cutoff => snapshots.push(snapshot),
            Some(snapshot) => debug!(
                "Skipping {}: captured {} is outside the window",
                path.display(),
                snapshot.captured_at
            ),
            None => {}
        }
    }

    snapshots.sort_by_key(|s| s.captured_at);
    info!(
        "Loaded {} snapshots from {} (window {} days)",
        snapshots.len(),
        dir.display(),
        window_days
    );
    Ok(snapshots)
}

/// Oldest capture time inside the window; windows reaching past the
/// representable range keep everything.
fn window_cutoff(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(window_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Read one snapshot file, or `None` (logged) if it is unusable.
fn read_snapshot(path: &Path) -> Option<Snapshot> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Skipping unreadable snapshot {}: {}", path.display(), e);
            return None;
        }
    };

    let file: SnapshotFile = match serde_json::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            warn!("Skipping malformed snapshot {}: {}", path.display(), e);
            return None;
        }
    };

    let captured_at = match file.scraped_at_text().and_then(parse_timestamp) {
        Some(ts) => ts,
        None => match modified_time(path) {
            Some(ts) => {
                debug!("Using modification time for {}", path.display());
                ts
            }
            None => {
                warn!("Skipping snapshot {} with no usable timestamp", path.display());
                return None;
            }
        },
    };

    Some(file.into_snapshot(captured_at))
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Parse a capture timestamp.
///
/// Accepts RFC 3339 with any offset, or a naive ISO-8601 date-time with an
/// optional trailing `Z`, taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    let naive = text.strip_suffix('Z').unwrap_or(text);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|ts| ts.and_utc())
}
