//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod aggregate;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rankwatch::config::{
    AggregateConfig, FetchConfig, DEFAULT_BASE_BACKOFF_SECS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_BACKOFF_SECS, DEFAULT_MAX_RANK, DEFAULT_WINDOW_DAYS,
};

#[derive(Parser)]
#[command(name = "rankwatch")]
#[command(about = "Bestseller-list snapshot capture and trend reporting")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Retry knobs shared by every command that fetches.
#[derive(clap::Args, Debug, Clone)]
struct RetryArgs {
    /// Maximum fetch attempts per page
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: u32,

    /// Initial backoff in seconds after a blocked or failed attempt
    #[arg(long, env = "BASE_BACKOFF", default_value_t = DEFAULT_BASE_BACKOFF_SECS,
          value_parser = parse_seconds)]
    base_backoff: f64,

    /// Upper bound in seconds for any single backoff wait
    #[arg(long, env = "MAX_BACKOFF", default_value_t = DEFAULT_MAX_BACKOFF_SECS,
          value_parser = parse_seconds)]
    max_backoff: f64,
}

/// Finite, non-negative seconds.
fn parse_seconds(value: &str) -> Result<f64, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("'{}' must be a finite, non-negative number of seconds", value));
    }
    Ok(secs)
}

impl RetryArgs {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::with_retry_budget(self.max_attempts, self.base_backoff, self.max_backoff)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one snapshot of a bestseller category page
    Scrape {
        /// Category page to fetch
        #[arg(long)]
        category_url: String,
        /// Snapshot file to write
        #[arg(long)]
        output: PathBuf,
        /// Pin a user agent (default: rotate browser user agents per attempt)
        #[arg(long)]
        ua: Option<String>,
        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Build a trend report from recent snapshots
    Aggregate {
        /// Directory holding snapshot JSON files
        #[arg(long)]
        data_dir: PathBuf,
        /// Only load snapshots from the last N days
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        days: u32,
        /// Only report items ranked at or above this position
        #[arg(long, default_value_t = DEFAULT_MAX_RANK)]
        max_rank: u32,
        /// Skip items already surfaced on an earlier day
        #[arg(long)]
        new_only: bool,
        /// Report JSON file to write
        #[arg(long)]
        output_json: PathBuf,
        /// Report CSV file to write
        #[arg(long)]
        output_csv: PathBuf,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            category_url,
            output,
            ua,
            retry,
        } => scrape::cmd_scrape(&category_url, &output, ua.as_deref(), retry.fetch_config()).await,
        Commands::Aggregate {
            data_dir,
            days,
            max_rank,
            new_only,
            output_json,
            output_csv,
        } => {
            let config = AggregateConfig {
                window_days: days,
                max_rank,
                new_only,
            };
            aggregate::cmd_aggregate(&data_dir, config, &output_json, &output_csv).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_aggregate_defaults() {
        let cli = Cli::try_parse_from([
            "rankwatch",
            "aggregate",
            "--data-dir",
            "data",
            "--output-json",
            "r.json",
            "--output-csv",
            "r.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Aggregate {
                days,
                max_rank,
                new_only,
                ..
            } => {
                assert_eq!(days, 7);
                assert_eq!(max_rank, 50);
                assert!(!new_only);
            }
            _ => panic!("expected aggregate"),
        }
    }

    #[test]
    fn test_scrape_rejects_zero_attempts() {
        let result = Cli::try_parse_from([
            "rankwatch",
            "scrape",
            "--category-url",
            "https://www.amazon.com/gp/bestsellers/fashion",
            "--output",
            "snap.json",
            "--max-attempts",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("2.5"), Ok(2.5));
        assert_eq!(parse_seconds("0"), Ok(0.0));
        assert!(parse_seconds("inf").is_err());
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
    }

    #[test]
    fn test_scrape_rejects_infinite_backoff() {
        let result = Cli::try_parse_from([
            "rankwatch",
            "scrape",
            "--category-url",
            "https://www.amazon.com/gp/bestsellers/fashion",
            "--output",
            "snap.json",
            "--max-backoff",
            "inf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scrape_retry_flags() {
        let cli = Cli::try_parse_from([
            "rankwatch",
            "-v",
            "scrape",
            "--category-url",
            "https://www.amazon.com/gp/bestsellers/fashion",
            "--output",
            "snap.json",
            "--ua",
            "TestAgent/1.0",
            "--max-attempts",
            "3",
            "--base-backoff",
            "2.5",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Scrape { ua, retry, .. } => {
                assert_eq!(ua.as_deref(), Some("TestAgent/1.0"));
                let config = retry.fetch_config();
                assert_eq!(config.max_attempts, 3);
                assert_eq!(config.base_backoff.as_secs_f64(), 2.5);
            }
            _ => panic!("expected scrape"),
        }
    }
}
