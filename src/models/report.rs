//! Trend report rows and envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CSV header, in column order.
pub const REPORT_COLUMNS: [&str; 9] = [
    "asin",
    "title",
    "link",
    "current_rank",
    "category_url",
    "days_seen",
    "first_seen",
    "keywords",
    "idea_prompt",
];

/// One trending item in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "asin")]
    pub identity: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    /// Rank in the latest cohort.
    pub current_rank: u32,
    pub category_url: Option<String>,
    /// Distinct UTC calendar days the item was observed in the window.
    pub days_seen: usize,
    pub first_seen: DateTime<Utc>,
    pub keywords: Vec<String>,
    pub idea_prompt: String,
}

/// Report envelope written as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub generated_at: DateTime<Utc>,
    pub window_days: u32,
    pub max_rank: u32,
    pub new_only: bool,
    pub items: Vec<ReportRow>,
}

impl TrendReport {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
