//! # Archive News Scraper
//!
//! Crawls a newspaper's day-by-day archive over a range of years, extracts
//! the headline and body of every listed article, and keeps one CSV file per
//! day, deduplicated by article URL.
//!
//! ## Usage
//!
//! ```sh
//! archive_news_scraper --start-year 2000 --end-year 2002 -o ./news_articles
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Partitioning**: Split the date range into fixed-size batches
//! 2. **Indexing**: Resolve each date to its article URLs, one date at a time
//! 3. **Fetching**: Download and parse articles concurrently (bounded worker pool)
//! 4. **Output**: Merge each batch into the per-day CSV files before moving on
//!
//! Failed archive pages are reported and skipped for the rest of the run;
//! failed article pages are dropped silently. Re-running merges into the
//! existing files.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod dispatch;
mod error;
mod http;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
#[cfg(test)]
mod test_utils;
mod tracker;
mod utils;

use cli::Cli;
use http::HttpSource;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("archive_news_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = args.resolve_config()?;
    config.validate()?;
    let (start, end) = dates::year_bounds(config.start_year, config.end_year)?;
    info!(%start, %end, "Resolved date range");

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let source = HttpSource::new(&config.user_agent)?;
    let summary = pipeline::run(&config, &source, start, end).await?;

    if !summary.failed_dates.is_empty() {
        warn!(
            count = summary.failed_dates.len(),
            first = %summary.failed_dates[0],
            "Some archive dates could not be fetched; re-run to retry them"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        records = summary.records_fetched,
        rows = summary.rows_written,
        quarantined = summary.quarantined,
        "Execution complete"
    );

    Ok(())
}
