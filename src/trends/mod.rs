//! Multi-day trend aggregation over stored snapshots.
//!
//! `load_snapshots` reads the trailing window from disk, `build_history`
//! folds every observation per item, and `aggregate` filters the latest
//! cohort into report rows.

pub mod aggregate;
pub mod history;
pub mod keywords;
pub mod loader;

pub use aggregate::{
    aggregate, build_report, build_rows, idea_prompt, previously_surfaced, select_candidates,
    Candidate,
};
pub use history::{build_history, HistoryEntry};
pub use keywords::{extract_keywords, MAX_KEYWORDS};
pub use loader::{load_snapshots, load_snapshots_at, parse_timestamp, LoadError};
