//! rankwatch - bestseller-list snapshot capture and trend reporting.
//!
//! Two halves share this crate:
//! - `scrapers`: fetch a ranked category page under rate limiting and
//!   bot challenges, then extract its ranked items.
//! - `trends`: load dated snapshots from disk and aggregate them into a
//!   report of newly surfacing low-rank items with keyword suggestions.

pub mod config;
pub mod models;
pub mod scrapers;
pub mod storage;
pub mod trends;
mod utils;

pub use config::{AggregateConfig, FetchConfig};
pub use models::{ListingItem, ReportRow, Snapshot, TrendReport};
pub use scrapers::{capture_snapshot, extract_items, FetchError, Fetcher, HttpClient};
pub use trends::{aggregate, extract_keywords, load_snapshots};
