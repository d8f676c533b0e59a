//! Page transport.
//!
//! [`PageSource`] is the only way the scrapers reach the network. The
//! production implementation, [`HttpSource`], shares a single
//! `reqwest::Client` (and so its connection pool) across every concurrent
//! fetch. Tests substitute an in-memory source.

use crate::error::{Error, Result};
use crate::models::FetchOutcome;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

/// Something that can GET a page body within a timeout.
pub trait PageSource {
    /// Fetch `url`, giving up after `timeout`.
    ///
    /// Returns the body on HTTP 200 and a failure outcome otherwise; never panics
    /// or propagates an error.
    async fn get(&self, url: &str, timeout: Duration) -> FetchOutcome<String>;
}

/// [`PageSource`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Build a client that sends `user_agent` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `user_agent` is not a valid header
    /// value (control characters, newlines), and [`Error::Http`] if the TLS
    /// backend cannot be initialised.
    pub fn new(user_agent: &str) -> Result<Self> {
        let ua = HeaderValue::from_str(user_agent).map_err(|e| {
            Error::Configuration(format!("invalid user_agent {:?}: {}", user_agent, e))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, ua);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    #[instrument(level = "debug", skip(self), fields(timeout_ms = timeout.as_millis() as u64))]
    async fn get(&self, url: &str, timeout: Duration) -> FetchOutcome<String> {
        let response = match self.client.get(url).timeout(timeout).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return FetchOutcome::Timeout,
            Err(e) => return FetchOutcome::Transport(e.to_string()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "Non-200 response");
            return FetchOutcome::HttpError(status.as_u16());
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success(body),
            Err(e) if e.is_timeout() => FetchOutcome::Timeout,
            Err(e) => FetchOutcome::Transport(e.to_string()),
        }
    }
}
