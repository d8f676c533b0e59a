//! Bounded-concurrency article fetching.
//!
//! Every URL for a date is pushed through [`fetch_article`] with at most
//! `max_workers` requests in flight. The call returns only once every URL has
//! an outcome. Failed fetches are logged and dropped here; this is the one
//! place where a [`FetchOutcome`](crate::models::FetchOutcome) collapses into
//! "no record".

use crate::http::PageSource;
use crate::models::ArticleRecord;
use crate::scrapers::article::fetch_article;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Fetch all `urls` for `date`, returning the records that came back.
///
/// Result order follows completion order and is not meaningful. No URL is
/// retried.
///
/// # Arguments
///
/// * `source` - Transport shared by every in-flight fetch
/// * `urls` - Article URLs for one date
/// * `date` - Archive day passed through to each record
/// * `max_workers` - Upper bound on concurrent fetches (0 is treated as 1)
/// * `timeout` - Per-article deadline
///
/// # Returns
///
/// One record per URL that fetched successfully, after every URL has
/// finished. Failures are logged at debug level and left out.
#[instrument(level = "info", skip(source, urls), fields(%date, urls = urls.len()))]
pub async fn dispatch<S: PageSource>(
    source: &S,
    urls: Vec<String>,
    date: NaiveDate,
    max_workers: usize,
    timeout: Duration,
) -> Vec<ArticleRecord> {
    let total = urls.len();
    let records: Vec<ArticleRecord> = stream::iter(urls)
        .map(|url| async move {
            let outcome = fetch_article(source, &url, date, timeout).await;
            if !outcome.is_success() {
                debug!(%url, %outcome, "Article dropped");
            }
            outcome.into_option()
        })
        .buffer_unordered(max_workers.max(1))
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(
        total,
        fetched = records.len(),
        dropped = total - records.len(),
        "Fetched article contents"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FetchOutcome;
    use crate::test_utils::{StubSource, article_html};
    use std::collections::HashSet;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2002, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_keeps_only_successes() {
        let source = StubSource::new()
            .page("https://s/1", &article_html("One", &["a"]))
            .page("https://s/2", &article_html("Two", &["b"]))
            .outcome("https://s/3", FetchOutcome::Timeout)
            .outcome("https://s/4", FetchOutcome::HttpError(503));
        let urls: Vec<String> = (1..=5).map(|i| format!("https://s/{}", i)).collect();

        let records = dispatch(&source, urls, day(), 3, Duration::from_secs(1)).await;

        let got: HashSet<String> = records.iter().map(|r| r.url.clone()).collect();
        let want: HashSet<String> = ["https://s/1", "https://s/2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(got, want);
        assert!(records.iter().all(|r| r.date == "2002-06-01"));
        assert_eq!(source.requests(), 5);
    }

    #[tokio::test]
    async fn test_dispatch_respects_worker_cap() {
        let mut source = StubSource::new().with_delay(Duration::from_millis(20));
        let urls: Vec<String> = (0..20).map(|i| format!("https://s/{}", i)).collect();
        for url in &urls {
            source = source.page(url, &article_html("h", &["c"]));
        }

        let records = dispatch(&source, urls, day(), 4, Duration::from_secs(1)).await;

        assert_eq!(records.len(), 20);
        assert!(source.peak_in_flight() <= 4, "peak {}", source.peak_in_flight());
        assert!(source.peak_in_flight() > 1, "fetches never overlapped");
    }

    #[tokio::test]
    async fn test_dispatch_empty() {
        let source = StubSource::new();
        let records = dispatch(&source, Vec::new(), day(), 4, Duration::from_secs(1)).await;
        assert!(records.is_empty());
        assert_eq!(source.requests(), 0);
    }
}
