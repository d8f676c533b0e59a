//! Per-day CSV stores.
//!
//! Each archive date owns one file, `{output_dir}/{YYYY-MM-DD}.csv`, with the
//! columns `date,headline,content,url`. Saving a batch is a read-modify-write
//! merge: existing rows are loaded, the new rows appended, and the result
//! deduplicated by `url` with the last occurrence winning.
//!
//! # Output Structure
//!
//! ```text
//! news_articles/
//! ├── 2000-01-01.csv
//! ├── 2000-01-02.csv
//! └── 2000-01-03.csv.corrupt   # quarantined, unreadable store
//! ```
//!
//! # Corrupt Stores
//!
//! A store that exists but does not parse as CSV rows is renamed to
//! `{date}.csv.corrupt` (or `{date}.csv.corrupt.1`, `.2`, ... when earlier
//! quarantines exist) and a fresh store is written from the new rows. I/O
//! failures are not treated as corruption and abort the save.

use crate::error::Result;
use crate::models::ArticleRecord;
use itertools::Itertools;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// What a call to [`save_batch`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Distinct dates touched.
    pub dates: usize,
    /// Rows across all rewritten stores after merging.
    pub rows_written: usize,
    /// Stores moved aside because they could not be read.
    pub quarantined: Vec<PathBuf>,
}

/// Location of the store for `date` (`YYYY-MM-DD`).
pub fn daily_store_path(output_dir: &Path, date: &str) -> PathBuf {
    output_dir.join(format!("{}.csv", date))
}

/// Deduplicate by `url`; a later row replaces an earlier one in its position.
pub fn merge_by_url(rows: impl IntoIterator<Item = ArticleRecord>) -> Vec<ArticleRecord> {
    let mut merged: Vec<ArticleRecord> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match position.get(&row.url) {
            Some(&i) => merged[i] = row,
            None => {
                position.insert(row.url.clone(), merged.len());
                merged.push(row);
            }
        }
    }
    merged
}

/// Read every row of an existing store.
pub fn read_store(path: &Path) -> Result<Vec<ArticleRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ArticleRecord>, csv::Error>>()?;
    Ok(rows)
}

/// Overwrite a store with `rows`, via a temporary file and rename.
///
/// On failure the temporary file is removed and the store is left as it was.
fn write_store(path: &Path, rows: &[ArticleRecord]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    let written = write_rows(&tmp, rows).and_then(|()| fs::rename(&tmp, path).map_err(Into::into));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_rows(path: &Path, rows: &[ArticleRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// First free quarantine name for `path`: `.csv.corrupt`, then `.csv.corrupt.1`, ...
fn quarantine_path(path: &Path) -> PathBuf {
    let first = path.with_extension("csv.corrupt");
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| path.with_extension(format!("csv.corrupt.{}", n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Existing rows for a store, or none if it is missing or quarantined.
fn load_existing(path: &Path, report: &mut BatchReport) -> Result<Vec<ArticleRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    match read_store(path) {
        Ok(rows) => Ok(rows),
        Err(crate::error::Error::Csv(e)) if !e.is_io_error() => {
            let quarantine = quarantine_path(path);
            warn!(
                path = %path.display(),
                quarantine = %quarantine.display(),
                error = %e,
                "Existing store is unreadable; quarantining and starting fresh"
            );
            fs::rename(path, &quarantine)?;
            report.quarantined.push(quarantine);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Merge a batch of records into the per-day stores under `output_dir`.
///
/// Records may span many dates. Within each date the new rows are ordered by
/// URL before merging, so the result does not depend on fetch completion
/// order. An empty batch touches nothing.
///
/// # Arguments
///
/// * `output_dir` - Directory holding the `{date}.csv` stores; must exist
/// * `records` - Records from one chunk, in any order and for any dates
///
/// # Returns
///
/// A [`BatchReport`] with the dates touched, the rows now on disk for those
/// dates, and any stores quarantined along the way.
///
/// # Errors
///
/// Returns an error if a store cannot be read (other than being corrupt),
/// written, or renamed. Stores saved before the failure keep their new rows.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), records = records.len()))]
pub fn save_batch(output_dir: &Path, records: Vec<ArticleRecord>) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    if records.is_empty() {
        debug!("Empty batch; nothing to save");
        return Ok(report);
    }

    let by_date = records.into_iter().into_group_map_by(|r| r.date.clone());

    for (date, mut group) in by_date.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
        group.sort_by(|a, b| a.url.cmp(&b.url));
        let path = daily_store_path(output_dir, &date);

        let existing = load_existing(&path, &mut report)?;
        let existing_count = existing.len();
        let merged = merge_by_url(existing.into_iter().chain(group));

        write_store(&path, &merged)?;
        debug!(
            %date,
            existing = existing_count,
            total = merged.len(),
            "Merged daily store"
        );

        report.dates += 1;
        report.rows_written += merged.len();
    }

    info!(
        dates = report.dates,
        rows = report.rows_written,
        quarantined = report.quarantined.len(),
        "Saved batch"
    );
    Ok(report)
}
