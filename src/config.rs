//! Run configuration.
//!
//! Values come from three layers, later ones winning:
//! 1. Built-in defaults ([`ScraperConfig::default`])
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags and their environment variables (see [`crate::cli`])
//!
//! # Example config.yaml
//!
//! ```yaml
//! start_year: 2001
//! end_year: 2001
//! max_workers: 8
//! batch_size: 30
//! output_dir: ./toi_2001
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://timesofindia.indiatimes.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// First archive year, starting January 1st.
    pub start_year: i32,
    /// Last archive year, through December 31st.
    pub end_year: i32,
    /// Maximum article fetches in flight at once.
    pub max_workers: usize,
    /// Dates per chunk; one persist per chunk.
    pub batch_size: usize,
    /// Directory holding the per-day CSV files.
    pub output_dir: PathBuf,
    /// Scheme and host of the archive site.
    pub base_url: String,
    /// Sent with every request.
    pub user_agent: String,
    pub index_timeout_secs: u64,
    pub article_timeout_secs: u64,
    /// Above this worker count, pause between chunks.
    pub throttle_threshold: usize,
    pub throttle_pause_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            start_year: 2000,
            end_year: 2002,
            max_workers: 20,
            batch_size: 50,
            output_dir: PathBuf::from("news_articles"),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            index_timeout_secs: 10,
            article_timeout_secs: 15,
            throttle_threshold: 15,
            throttle_pause_ms: 1000,
        }
    }
}

impl ScraperConfig {
    /// Load from a YAML file; fields missing from the file keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    /// Parse YAML text; keys left out keep their defaults.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::Configuration("max_workers must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::Configuration("batch_size must be at least 1".into()));
        }
        if self.end_year < self.start_year {
            return Err(Error::Configuration(format!(
                "end_year {} is before start_year {}",
                self.end_year, self.start_year
            )));
        }
        self.base()?;
        Ok(())
    }

    /// Parsed `base_url`.
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::Configuration(format!("invalid base_url {:?}: {}", self.base_url, e)))
    }

    /// Deadline for one archive index page request.
    pub fn index_timeout(&self) -> Duration {
        Duration::from_secs(self.index_timeout_secs)
    }

    /// Deadline for one article page request.
    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }

    /// Pause to insert after each chunk, if the worker count calls for one.
    pub fn chunk_pause(&self) -> Option<Duration> {
        (self.max_workers > self.throttle_threshold)
            .then(|| Duration::from_millis(self.throttle_pause_ms))
    }
}
