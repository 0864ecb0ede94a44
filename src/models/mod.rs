//! Data models for rankwatch.

mod item;
mod report;
mod snapshot;

pub use item::{composite_key, parse_rank, ListingItem};
pub use report::{ReportRow, TrendReport, REPORT_COLUMNS};
pub use snapshot::{Snapshot, SnapshotFile};
