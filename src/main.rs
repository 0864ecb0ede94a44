//! rankwatch - bestseller-list snapshot capture and trend reporting.
//!
//! `rankwatch scrape` captures one dated snapshot of a category page;
//! `rankwatch aggregate` turns the recent snapshots into a trend report.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let default_filter = if cli::is_verbose() {
        "rankwatch=info"
    } else {
        "rankwatch=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
