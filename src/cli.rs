//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also come from an environment variable, and anything left
//! unset falls back to the config file (if given) and then to the defaults
//! in [`ScraperConfig`].

use crate::config::ScraperConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: 2000 through 2002 into ./news_articles
/// archive_news_scraper
///
/// # One year, gentler on the site
/// archive_news_scraper --start-year 2001 --end-year 2001 --max-workers 8
///
/// # Settings from a file, output directory overridden
/// archive_news_scraper -c config.yaml -o /data/toi
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, env = "SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// First year to crawl (from January 1st)
    #[arg(long, env = "SCRAPER_START_YEAR")]
    pub start_year: Option<i32>,

    /// Last year to crawl (through December 31st)
    #[arg(long, env = "SCRAPER_END_YEAR")]
    pub end_year: Option<i32>,

    /// Maximum concurrent article fetches
    #[arg(short = 'w', long, env = "SCRAPER_MAX_WORKERS")]
    pub max_workers: Option<usize>,

    /// Dates per batch; output is saved after every batch
    #[arg(short, long, env = "SCRAPER_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Directory for the per-day CSV files
    #[arg(short, long, env = "SCRAPER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Archive site base URL
    #[arg(long, env = "SCRAPER_BASE_URL")]
    pub base_url: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, env = "SCRAPER_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl Cli {
    /// Layer the config file (if any) and then these flags over the defaults.
    pub fn resolve_config(&self) -> Result<ScraperConfig> {
        let mut config = match &self.config {
            Some(path) => ScraperConfig::from_yaml_file(path)?,
            None => ScraperConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut ScraperConfig) {
        if let Some(v) = self.start_year {
            config.start_year = v;
        }
        if let Some(v) = self.end_year {
            config.end_year = v;
        }
        if let Some(v) = self.max_workers {
            config.max_workers = v;
        }
        if let Some(v) = self.batch_size {
            config.batch_size = v;
        }
        if let Some(v) = &self.output_dir {
            config.output_dir = v.clone();
        }
        if let Some(v) = &self.base_url {
            config.base_url = v.clone();
        }
        if let Some(v) = &self.user_agent {
            config.user_agent = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_args_uses_defaults() {
        let cli = Cli::parse_from(["archive_news_scraper"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config, ScraperConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "archive_news_scraper",
            "--start-year",
            "2001",
            "--end-year",
            "2001",
            "-w",
            "8",
            "-b",
            "10",
            "-o",
            "/tmp/out",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.start_year, 2001);
        assert_eq!(config.end_year, 2001);
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "max_workers: 3\nbatch_size: 9\n").unwrap();

        let cli = Cli::parse_from([
            "archive_news_scraper",
            "--config",
            path.to_str().unwrap(),
            "--max-workers",
            "6",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.max_workers, 6);
        assert_eq!(config.batch_size, 9);
    }
}
