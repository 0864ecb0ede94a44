//! One scrape run: fetch a category page and turn it into a snapshot.

use tracing::{info, warn};

use super::error::FetchError;
use super::extract::extract_items;
use super::fetcher::{Fetcher, Sleeper};
use super::http_client::Transport;
use crate::models::Snapshot;

/// Fetch `category_url` and extract its ranked items, resolving links
/// against `base_url`.
///
/// A fetch failure is returned as-is and nothing is captured. A page with
/// no recognisable items still yields a (empty) snapshot.
pub async fn capture_snapshot<T: Transport, S: Sleeper>(
    fetcher: &Fetcher<T, S>,
    category_url: &str,
    base_url: &str,
    user_agent: Option<&str>,
) -> Result<Snapshot, FetchError> {
    let html = fetcher.fetch(category_url, user_agent).await?;
    let items = extract_items(&html, base_url);
    if items.is_empty() {
        warn!("No ranked items found on {}", category_url);
    } else {
        info!("Extracted {} items from {}", items.len(), category_url);
    }
    Ok(Snapshot::capture(category_url, items))
}
