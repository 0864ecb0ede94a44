//! Latest-cohort filtering and report rows.
//!
//! The latest cohort is every snapshot sharing exactly the newest capture
//! time; all older snapshots are "previous days". An item is a candidate
//! when its rank in the cohort is at or below `max_rank`. With `new_only`,
//! candidates already ranked at or below `max_rank` in any previous
//! snapshot are dropped. The threshold applied to previous snapshots is
//! the one passed to this run, not the one in effect when they were
//! captured.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::history::{build_history, HistoryEntry};
use super::keywords::extract_keywords;
use crate::config::AggregateConfig;
use crate::models::{ListingItem, ReportRow, Snapshot, TrendReport};

const PROMPT_PREFIX: &str = "Create an original, text-forward T-shirt design around: ";
const PROMPT_SUFFIX: &str = ". Use clear fonts and simple iconography. Avoid trademarks.";

/// An item from the latest cohort that passed the rank and novelty filters.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub key: String,
    pub item: &'a ListingItem,
    pub category_url: Option<&'a str>,
    pub rank: u32,
    pub captured_at: DateTime<Utc>,
}

/// Aggregate snapshots into report rows, most prominent first.
///
/// No snapshots means no rows. Items without a numeric rank never count,
/// neither as candidates nor as previously surfaced.
pub fn aggregate(snapshots: &[Snapshot], max_rank: u32, new_only: bool) -> Vec<ReportRow> {
    let history = build_history(snapshots);
    let candidates = select_candidates(snapshots, max_rank, new_only);
    build_rows(&candidates, &history)
}

/// Aggregate into a full report envelope.
pub fn build_report(
    snapshots: &[Snapshot],
    config: &AggregateConfig,
    generated_at: DateTime<Utc>,
) -> TrendReport {
    let items = aggregate(snapshots, config.max_rank, config.new_only);
    info!(
        "Aggregated {} snapshots into {} report rows (max rank {}, new only {})",
        snapshots.len(),
        items.len(),
        config.max_rank,
        config.new_only
    );
    TrendReport {
        generated_at,
        window_days: config.window_days,
        max_rank: config.max_rank,
        new_only: config.new_only,
        items,
    }
}

/// Filter the latest cohort down to distinct candidates, sorted by rank.
///
/// Sorting is stable, so equal ranks keep encounter order. When a key
/// repeats within the cohort its best-ranked occurrence is kept.
pub fn select_candidates(
    snapshots: &[Snapshot],
    max_rank: u32,
    new_only: bool,
) -> Vec<Candidate<'_>> {
    let Some(latest) = snapshots.iter().map(|s| s.captured_at).max() else {
        return Vec::new();
    };
    let (today, previous): (Vec<&Snapshot>, Vec<&Snapshot>) =
        snapshots.iter().partition(|s| s.captured_at == latest);

    let surfaced = if new_only {
        previously_surfaced(&previous, max_rank)
    } else {
        HashSet::new()
    };

    let mut candidates = Vec::new();
    for snapshot in today {
        let category = snapshot.category_url.as_deref();
        for item in &snapshot.items {
            let Some(rank) = item.rank_number().filter(|r| *r <= max_rank) else {
                continue;
            };
            let key = item.composite_key(category);
            if new_only && surfaced.contains(&key) {
                debug!("Dropping {}: already surfaced on an earlier day", key);
                continue;
            }
            candidates.push(Candidate {
                key,
                item,
                category_url: category,
                rank,
                captured_at: snapshot.captured_at,
            });
        }
    }

    candidates.sort_by_key(|c| c.rank);
    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.key.clone()));
    candidates
}

/// Keys ranked at or below `max_rank` in any of the given snapshots.
pub fn previously_surfaced(previous: &[&Snapshot], max_rank: u32) -> HashSet<String> {
    previous
        .iter()
        .flat_map(|snapshot| {
            let category = snapshot.category_url.as_deref();
            snapshot
                .items
                .iter()
                .filter(|item| item.rank_number().is_some_and(|r| r <= max_rank))
                .map(move |item| item.composite_key(category))
        })
        .collect()
}

/// Turn candidates into report rows using the full history.
pub fn build_rows(
    candidates: &[Candidate<'_>],
    history: &HashMap<String, HistoryEntry>,
) -> Vec<ReportRow> {
    candidates
        .iter()
        .map(|candidate| {
            let entry = history.get(&candidate.key);
            let keywords = extract_keywords(candidate.item.title.as_deref());
            ReportRow {
                identity: candidate.item.identity.clone(),
                title: candidate.item.title.clone(),
                link: candidate.item.link.clone(),
                current_rank: candidate.rank,
                category_url: candidate.category_url.map(str::to_string),
                days_seen: entry.map_or(1, HistoryEntry::days_seen),
                first_seen: entry
                    .and_then(HistoryEntry::first_seen)
                    .unwrap_or(candidate.captured_at),
                idea_prompt: idea_prompt(&keywords),
                keywords,
            }
        })
        .collect()
}

/// Creative prompt embedding the keyword list.
pub fn idea_prompt(keywords: &[String]) -> String {
    format!("{}{}{}", PROMPT_PREFIX, keywords.join(", "), PROMPT_SUFFIX)
}
