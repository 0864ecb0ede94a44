//! Snapshot capture command.

use std::path::Path;

use anyhow::Context;
use console::style;

use rankwatch::config::{FetchConfig, DEFAULT_BASE_URL};
use rankwatch::scrapers::{capture_snapshot, Fetcher, HttpClient};
use rankwatch::storage::write_snapshot;

/// Fetch one category page and write it as a snapshot file.
pub async fn cmd_scrape(
    category_url: &str,
    output: &Path,
    user_agent: Option<&str>,
    config: FetchConfig,
) -> anyhow::Result<()> {
    let client = HttpClient::new(&config).context("Failed to build HTTP client")?;
    let fetcher = Fetcher::new(client, config);

    let snapshot = match capture_snapshot(&fetcher, category_url, DEFAULT_BASE_URL, user_agent)
        .await
    {
        Ok(snapshot) => snapshot,
        Err(e) => {
            if e.is_retry_exhausted() {
                eprintln!(
                    "{} Gave up after {} attempts; try later or raise MAX_ATTEMPTS",
                    style("✗").red(),
                    fetcher.config().max_attempts
                );
            }
            return Err(e).with_context(|| format!("Failed to scrape {}", category_url));
        }
    };

    write_snapshot(output, &snapshot)
        .with_context(|| format!("Failed to write snapshot {}", output.display()))?;

    println!(
        "{} Wrote {} ({} items)",
        style("✓").green(),
        output.display(),
        snapshot.items.len()
    );
    Ok(())
}
