//! Data models for scraped articles and fetch results.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One extracted article, also the row type of the daily CSV files
//! - [`FetchOutcome`]: The tagged result of a single network fetch
//!
//! Fetch failures are kept as values so they can be logged with their cause,
//! and are only collapsed into "no data" at the dispatcher and pipeline boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single article as extracted from the archive.
///
/// Records are identified by `url` within a given date's store. The column
/// order of the daily CSV files follows the field order here.
///
/// # Fields
///
/// * `date` - The archive date the article was listed under, `YYYY-MM-DD`
/// * `headline` - Trimmed headline text, empty if no headline was found
/// * `content` - Whitespace-collapsed body text, empty if no body was found
/// * `url` - Absolute article URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub date: String,
    pub headline: String,
    pub content: String,
    pub url: String,
}

/// Result of one bounded-timeout fetch.
///
/// `Success` carries the payload. Every other variant describes why nothing
/// usable came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The request succeeded and the payload was extracted.
    Success(T),
    /// The request did not complete within its timeout.
    Timeout,
    /// The server answered with a status other than 200.
    HttpError(u16),
    /// Connection, TLS or body-read failure.
    Transport(String),
    /// The response arrived but could not be parsed.
    ParseError(String),
}

impl<T> FetchOutcome<T> {
    /// True only for [`FetchOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Collapse into the best-effort view: the payload or nothing.
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Success(v) => Some(v),
            _ => None,
        }
    }

    /// The payload, or the failure with its payload type erased.
    pub fn into_result(self) -> Result<T, FetchOutcome<()>> {
        match self {
            FetchOutcome::Success(v) => Ok(v),
            failure => Err(failure.map(|_| ())),
        }
    }

    /// Transform the payload, keeping the failure kind untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Success(v) => FetchOutcome::Success(f(v)),
            FetchOutcome::Timeout => FetchOutcome::Timeout,
            FetchOutcome::HttpError(status) => FetchOutcome::HttpError(status),
            FetchOutcome::Transport(e) => FetchOutcome::Transport(e),
            FetchOutcome::ParseError(e) => FetchOutcome::ParseError(e),
        }
    }
}

impl<T> fmt::Display for FetchOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Success(_) => write!(f, "success"),
            FetchOutcome::Timeout => write!(f, "timed out"),
            FetchOutcome::HttpError(status) => write!(f, "HTTP status {}", status),
            FetchOutcome::Transport(e) => write!(f, "transport error: {}", e),
            FetchOutcome::ParseError(e) => write!(f, "parse error: {}", e),
        }
    }
}
