//! In-memory [`PageSource`] for tests.

use crate::http::PageSource;
use crate::models::FetchOutcome;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned responses keyed by URL. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct StubSource {
    pages: HashMap<String, FetchOutcome<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requests: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), FetchOutcome::Success(body.to_string()));
        self
    }

    pub fn outcome(mut self, url: &str, outcome: FetchOutcome<String>) -> Self {
        self.pages.insert(url.to_string(), outcome);
        self
    }

    /// Hold every request open for `delay` so concurrency can be observed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PageSource for StubSource {
    async fn get(&self, url: &str, _timeout: Duration) -> FetchOutcome<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .unwrap_or(FetchOutcome::HttpError(404))
    }
}

/// Article page in the current markup generation.
pub fn article_html(headline: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>\n", p))
        .collect();
    format!(
        r#"<html><body>
<h1 class="HNMDR"><span>{}</span></h1>
<div class="_3YYSt clearfix">{}</div>
</body></html>"#,
        headline, body
    )
}

/// Archive index page linking to `hrefs`.
pub fn index_html(hrefs: &[&str]) -> String {
    let rows: String = hrefs
        .iter()
        .map(|h| format!("<tr><td><a href=\"{}\">story</a></td></tr>\n", h))
        .collect();
    format!(
        r#"<html><body>
<table class="content">{}</table>
</body></html>"#,
        rows
    )
}
