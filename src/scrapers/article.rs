//! Article page scraping.
//!
//! The site has shipped two markup generations over the years, each with its
//! own class names for the headline and the body. Extraction walks an ordered
//! list of [`MarkupScheme`]s and, independently for the headline and for the
//! body, keeps the first scheme whose selector matches. A new markup variant
//! is one more entry in [`default_schemes`].

use crate::http::PageSource;
use crate::models::{ArticleRecord, FetchOutcome};
use crate::utils::{joined_text, trimmed_text};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};

/// Headline and body selectors for one markup generation.
#[derive(Debug, Clone)]
pub struct MarkupScheme {
    pub name: &'static str,
    pub headline: Selector,
    pub content: Selector,
}

impl MarkupScheme {
    pub fn new(name: &'static str, headline: &str, content: &str) -> Result<Self, String> {
        Ok(Self {
            name,
            headline: Selector::parse(headline).map_err(|e| format!("{}: {}", headline, e))?,
            content: Selector::parse(content).map_err(|e| format!("{}: {}", content, e))?,
        })
    }
}

/// Current markup first, then the legacy one.
pub fn default_schemes() -> Result<Vec<MarkupScheme>, String> {
    Ok(vec![
        MarkupScheme::new("current", r#"h1[class*="HNMDR"]"#, r#"div[class*="_3YYSt"]"#)?,
        MarkupScheme::new(
            "legacy",
            r#"h1[class*="_23498"]"#,
            r#"div[class*="article_content"]"#,
        )?,
    ])
}

static DEFAULT_SCHEMES: Lazy<Result<Vec<MarkupScheme>, String>> = Lazy::new(default_schemes);

/// First element matched by any scheme, trying schemes in order.
fn first_match<'a>(
    document: &'a Html,
    schemes: &[MarkupScheme],
    pick: impl Fn(&MarkupScheme) -> &Selector,
) -> Option<(&'static str, ElementRef<'a>)> {
    schemes
        .iter()
        .find_map(|s| document.select(pick(s)).next().map(|el| (s.name, el)))
}

/// Build a record from an article page.
///
/// Missing headline or body become empty strings; `date` is taken as given,
/// not from the page.
pub fn extract_article(
    html: &str,
    url: &str,
    date: NaiveDate,
    schemes: &[MarkupScheme],
) -> ArticleRecord {
    let document = Html::parse_document(html);

    let headline = first_match(&document, schemes, |s| &s.headline);
    let content = first_match(&document, schemes, |s| &s.content);
    debug!(
        headline_scheme = headline.map(|(n, _)| n),
        content_scheme = content.map(|(n, _)| n),
        "Matched markup"
    );

    ArticleRecord {
        date: date.format("%Y-%m-%d").to_string(),
        headline: headline.map(|(_, el)| trimmed_text(el)).unwrap_or_default(),
        content: content.map(|(_, el)| joined_text(el)).unwrap_or_default(),
        url: url.to_string(),
    }
}

/// Fetch one article and extract it with the default schemes.
///
/// # Arguments
///
/// * `source` - Transport used for the single GET
/// * `url` - Absolute article URL, stored unchanged in the record
/// * `date` - Archive day the URL was listed under; becomes the record's `date`
/// * `timeout` - Deadline for the article request
///
/// # Returns
///
/// `Success` with the extracted record (headline or content may be empty
/// when the page matches no scheme). Timeouts, non-200 statuses and
/// transport errors return the matching failure variant and no record.
#[instrument(level = "debug", skip(source), fields(%date))]
pub async fn fetch_article<S: PageSource>(
    source: &S,
    url: &str,
    date: NaiveDate,
    timeout: Duration,
) -> FetchOutcome<ArticleRecord> {
    let schemes = match DEFAULT_SCHEMES.as_ref() {
        Ok(schemes) => schemes,
        Err(e) => return FetchOutcome::ParseError(e.clone()),
    };

    source
        .get(url, timeout)
        .await
        .map(|html| extract_article(&html, url, date, schemes))
}
