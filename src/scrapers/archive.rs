//! Archive index scraping.
//!
//! The site publishes one listing page per calendar day. Its URL embeds the
//! date twice: once as `year/month/day` path segments and once as a
//! `starttime` day counter measured from 1900-01-01 (where 1900-01-01 is day 1).
//!
//! # URL Pattern
//!
//! ```text
//! https://timesofindia.indiatimes.com/2000/1/1/archivelist/year-2000,month-1,starttime-36525.cms
//! ```
//!
//! Article links on that page live in `table.content` and contain `/articleshow/`.

use crate::http::PageSource;
use crate::models::FetchOutcome;
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

static ARTICLE_LINK_SELECTOR: Lazy<Result<Selector, String>> = Lazy::new(|| {
    Selector::parse(r#"table.content a[href*="/articleshow/"]"#).map_err(|e| e.to_string())
});

/// Day counter used by the archive: days since 1900-01-01, plus one.
pub fn starttime(date: NaiveDate) -> i64 {
    // 1900-01-01 is always a valid date.
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() + 1
}

/// Listing page URL for `date` under `base`.
pub fn archive_url(base: &Url, date: NaiveDate) -> String {
    let (year, month, day) = (date.year(), date.month(), date.day());
    format!(
        "{}/{}/{}/{}/archivelist/year-{},month-{},starttime-{}.cms",
        base.as_str().trim_end_matches('/'),
        year,
        month,
        day,
        year,
        month,
        starttime(date)
    )
}

/// Absolute article URLs found in a listing page, in document order, without repeats.
pub fn extract_links(base: &Url, html: &str) -> Result<Vec<String>, String> {
    let selector = ARTICLE_LINK_SELECTOR.as_ref().map_err(Clone::clone)?;
    let document = Html::parse_document(html);

    let links = document
        .select(selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(|u| u.to_string())
        .unique()
        .collect();
    Ok(links)
}

/// Fetch and parse the listing page for one date.
///
/// Any failure (timeout, non-200, transport, parse) comes back as the
/// matching [`FetchOutcome`] variant; the caller decides what to record.
///
/// # Arguments
///
/// * `source` - Transport used for the single GET
/// * `base` - Site root; both the index URL and relative article links resolve against it
/// * `date` - Archive day to list
/// * `timeout` - Deadline for the index request
///
/// # Returns
///
/// `Success` with the absolute article URLs in page order (possibly empty),
/// or the failure variant describing why the index could not be read.
#[instrument(level = "info", skip(source, base), fields(%date))]
pub async fn fetch_archive_links<S: PageSource>(
    source: &S,
    base: &Url,
    date: NaiveDate,
    timeout: Duration,
) -> FetchOutcome<Vec<String>> {
    let url = archive_url(base, date);
    debug!(%url, "Fetching archive index");

    match source.get(&url, timeout).await {
        FetchOutcome::Success(html) => match extract_links(base, &html) {
            Ok(links) => {
                info!(count = links.len(), "Indexed archive article URLs");
                FetchOutcome::Success(links)
            }
            Err(e) => FetchOutcome::ParseError(e),
        },
        failure => failure.map(|_| Vec::new()),
    }
}
