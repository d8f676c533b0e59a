//! Error types for the scraper.
//!
//! Network failures while fetching pages are *not* errors here: they are
//! carried as [`FetchOutcome`](crate::models::FetchOutcome) values and
//! absorbed by the pipeline. This enum covers the failures that abort a run:
//! bad configuration and persistence problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
