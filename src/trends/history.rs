//! Full-history fold over every loaded snapshot.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::Snapshot;

/// Everything observed about one item across the loaded snapshots.
///
/// Report rows read only the observation times; their title, link and
/// category come from the latest cohort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryEntry {
    /// Resolved ranks, in observation order.
    pub ranks: Vec<u32>,
    /// Capture time of every observation, ranked or not.
    pub seen_at: Vec<DateTime<Utc>>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub category_url: Option<String>,
}

impl HistoryEntry {
    /// Distinct UTC calendar days with an observation.
    pub fn days_seen(&self) -> usize {
        self.seen_at
            .iter()
            .map(|ts| ts.date_naive())
            .collect::<BTreeSet<NaiveDate>>()
            .len()
    }

    pub fn first_seen(&self) -> Option<DateTime<Utc>> {
        self.seen_at.iter().min().copied()
    }
}

/// Fold all snapshots into per-item history, keyed by composite key.
///
/// Snapshots are expected oldest first, so the title, link and category
/// kept for a key are the most recent ones seen.
pub fn build_history(snapshots: &[Snapshot]) -> HashMap<String, HistoryEntry> {
    let mut history: HashMap<String, HistoryEntry> = HashMap::new();

    for snapshot in snapshots {
        let category = snapshot.category_url.as_deref();
        for item in &snapshot.items {
            let entry = history.entry(item.composite_key(category)).or_default();
            if let Some(rank) = item.rank_number() {
                entry.ranks.push(rank);
            }
            entry.seen_at.push(snapshot.captured_at);
            if item.title.is_some() {
                entry.title = item.title.clone();
            }
            if item.link.is_some() {
                entry.link = item.link.clone();
            }
            if snapshot.category_url.is_some() {
                entry.category_url = snapshot.category_url.clone();
            }
        }
    }

    history
}
