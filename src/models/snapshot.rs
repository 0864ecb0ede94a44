//! Point-in-time captures of a category page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::ListingItem;

/// One capture of a ranked listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "scraped_at")]
    pub captured_at: DateTime<Utc>,
    pub category_url: Option<String>,
    pub items: Vec<ListingItem>,
}

impl Snapshot {
    /// Snapshot captured now.
    pub fn capture(category_url: &str, items: Vec<ListingItem>) -> Self {
        Self {
            captured_at: Utc::now(),
            category_url: Some(category_url.to_string()),
            items,
        }
    }
}

/// Snapshot file as found on disk, before its timestamp is resolved.
///
/// Every field is lenient: a missing or odd `scraped_at` falls back to the
/// file's modification time instead of rejecting the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub scraped_at: Option<serde_json::Value>,
    #[serde(default)]
    pub category_url: Option<String>,
    #[serde(default)]
    pub items: Vec<ListingItem>,
}

impl SnapshotFile {
    /// The declared capture time as text, if it is a string.
    pub fn scraped_at_text(&self) -> Option<&str> {
        self.scraped_at.as_ref().and_then(|v| v.as_str())
    }

    /// Attach a resolved capture time.
    pub fn into_snapshot(self, captured_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            captured_at,
            category_url: self.category_url,
            items: self.items,
        }
    }
}
