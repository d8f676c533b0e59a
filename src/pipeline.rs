//! The crawl loop.
//!
//! ```text
//! partition ─▶ chunk 0 ─▶ chunk 1 ─▶ … ─▶ done
//!                │
//!                ├─ for each date (sequential, skipping marked dates)
//!                │    ├─ fetch archive index  ── failure ─▶ mark date, report
//!                │    └─ dispatch article fetches (bounded, concurrent)
//!                └─ save_batch (merge into per-day stores)
//! ```
//!
//! A chunk is fully persisted before the next chunk's first request goes
//! out, so killing the process loses at most the chunk in progress.

use crate::config::ScraperConfig;
use crate::dates::{DateChunk, partition};
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::http::PageSource;
use crate::models::ArticleRecord;
use crate::outputs::csv::save_batch;
use crate::scrapers::archive::fetch_archive_links;
use crate::tracker::ErrorTracker;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Mutable state owned by the sequential loop for the length of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub errors: ErrorTracker,
}

/// Totals for a finished run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub chunks: usize,
    pub dates_attempted: usize,
    pub dates_skipped: usize,
    pub records_fetched: usize,
    pub rows_written: usize,
    pub quarantined: usize,
    pub failed_dates: Vec<NaiveDate>,
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} batches ({elapsed_precise})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message("Processing Batches");
    bar
}

/// Crawl `[start, end]` with a fresh [`RunContext`].
///
/// Chunks of `config.batch_size` dates are processed in order; each chunk is
/// saved under `config.output_dir` before the next begins.
///
/// # Arguments
///
/// * `config` - Validated settings (workers, batch size, timeouts, throttle)
/// * `source` - Transport for index and article pages
/// * `start` - First date, inclusive
/// * `end` - Last date, inclusive
///
/// # Returns
///
/// A [`RunSummary`] with counts for the run and the dates whose index
/// could not be fetched.
///
/// # Errors
///
/// Returns an error for invalid configuration or an inverted range, and when
/// a batch cannot be persisted. Fetch failures never abort the run.
pub async fn run<S: PageSource>(
    config: &ScraperConfig,
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RunSummary> {
    let mut ctx = RunContext::default();
    run_with_context(config, source, start, end, &mut ctx).await
}

/// Crawl `[start, end]`, honouring and extending the errors already in `ctx`.
#[instrument(level = "info", skip(config, source, ctx), fields(%start, %end))]
pub async fn run_with_context<S: PageSource>(
    config: &ScraperConfig,
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
    ctx: &mut RunContext,
) -> Result<RunSummary> {
    config.validate()?;
    let base = config.base()?;
    let chunks = partition(start, end, config.batch_size)?;
    let pause = config.chunk_pause();

    info!(
        chunks = chunks.len(),
        batch_size = config.batch_size,
        max_workers = config.max_workers,
        output_dir = %config.output_dir.display(),
        "Starting crawl"
    );

    let mut summary = RunSummary {
        chunks: chunks.len(),
        ..RunSummary::default()
    };
    let bar = progress_bar(chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        let records = process_chunk(config, &base, source, chunk, ctx, &mut summary, &bar).await;
        summary.records_fetched += records.len();

        let report = save_batch(&config.output_dir, records)?;
        summary.rows_written += report.rows_written;
        summary.quarantined += report.quarantined.len();
        bar.inc(1);

        if let Some(pause) = pause {
            if i + 1 < chunks.len() {
                debug!(?pause, "Throttling between chunks");
                sleep(pause).await;
            }
        }
    }
    bar.finish();

    summary.failed_dates = ctx.errors.dates();
    info!(
        chunks = summary.chunks,
        dates = summary.dates_attempted,
        skipped = summary.dates_skipped,
        records = summary.records_fetched,
        failed_dates = ctx.errors.len(),
        "Crawl complete"
    );
    Ok(summary)
}

/// Fetch every date in one chunk, one date at a time.
#[instrument(level = "info", skip_all, fields(first = ?chunk.first(), len = chunk.len()))]
async fn process_chunk<S: PageSource>(
    config: &ScraperConfig,
    base: &Url,
    source: &S,
    chunk: &DateChunk,
    ctx: &mut RunContext,
    summary: &mut RunSummary,
    bar: &ProgressBar,
) -> Vec<ArticleRecord> {
    let mut records = Vec::new();

    for &date in chunk {
        if ctx.errors.is_marked(date) {
            debug!(%date, "Skipping date marked as failed");
            summary.dates_skipped += 1;
            continue;
        }
        summary.dates_attempted += 1;

        let outcome = fetch_archive_links(source, base, date, config.index_timeout()).await;
        let urls = match outcome.into_result() {
            Ok(urls) => urls,
            Err(reason) => {
                ctx.errors.mark(date);
                bar.suspend(|| error!(%date, %reason, "Error in {}", date));
                continue;
            }
        };

        let fetched = dispatch(
            source,
            urls,
            date,
            config.max_workers,
            config.article_timeout(),
        )
        .await;
        records.extend(fetched);
    }
    records
}
