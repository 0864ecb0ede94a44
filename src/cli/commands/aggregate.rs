//! Trend report command.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use console::style;

use rankwatch::config::AggregateConfig;
use rankwatch::storage::{write_report_csv, write_report_json};
use rankwatch::trends::{build_report, load_snapshots};

/// Load recent snapshots from `data_dir` and write the report files.
pub async fn cmd_aggregate(
    data_dir: &Path,
    config: AggregateConfig,
    output_json: &Path,
    output_csv: &Path,
) -> anyhow::Result<()> {
    let snapshots = load_snapshots(data_dir, config.window_days)
        .with_context(|| format!("Failed to load snapshots from {}", data_dir.display()))?;

    if snapshots.is_empty() {
        println!(
            "{} No snapshots found in {} within the last {} days",
            style("!").yellow(),
            data_dir.display(),
            config.window_days
        );
    }

    let report = build_report(&snapshots, &config, Utc::now());

    write_report_json(output_json, &report)
        .with_context(|| format!("Failed to write {}", output_json.display()))?;
    write_report_csv(output_csv, &report.items)
        .with_context(|| format!("Failed to write {}", output_csv.display()))?;

    if report.is_empty() && !snapshots.is_empty() {
        println!(
            "{} No items in the latest snapshot passed the filters (max rank {})",
            style("!").yellow(),
            config.max_rank
        );
    }

    println!(
        "{} Wrote {} and {} with {} items",
        style("✓").green(),
        output_json.display(),
        output_csv.display(),
        report.items.len()
    );
    Ok(())
}
