//! Archive scrapers.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing** ([`archive`]): Resolve a calendar date to the article URLs
//!    listed on that day's archive page
//! 2. **Fetching** ([`article`]): Download each article and extract its
//!    headline and body text
//!
//! Both phases go through a [`PageSource`](crate::http::PageSource) and report
//! failures as [`FetchOutcome`](crate::models::FetchOutcome) values rather
//! than errors; what to do about a failure is up to the caller.

pub mod archive;
pub mod article;
