//! Date range partitioning.
//!
//! The run walks a contiguous, inclusive range of calendar dates. The range
//! is split up front into chunks of at most `batch_size` consecutive dates;
//! each chunk is fetched and then persisted before the next one starts.

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// An ordered run of consecutive dates processed as one unit.
pub type DateChunk = Vec<NaiveDate>;

/// Split `[start, end]` into ascending chunks of at most `chunk_size` dates.
///
/// Every date in the range appears exactly once, and only the last chunk
/// may be shorter than `chunk_size`.
///
/// # Errors
///
/// [`Error::Configuration`] if `end < start` or `chunk_size` is zero.
pub fn partition(start: NaiveDate, end: NaiveDate, chunk_size: usize) -> Result<Vec<DateChunk>> {
    if end < start {
        return Err(Error::Configuration(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    if chunk_size == 0 {
        return Err(Error::Configuration("batch size must be at least 1".into()));
    }

    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    Ok(dates.chunks(chunk_size).map(<[NaiveDate]>::to_vec).collect())
}

/// January 1st of `start_year` through December 31st of `end_year`.
pub fn year_bounds(start_year: i32, end_year: i32) -> Result<(NaiveDate, NaiveDate)> {
    if end_year < start_year {
        return Err(Error::Configuration(format!(
            "end year {} is before start year {}",
            end_year, start_year
        )));
    }
    let start = NaiveDate::from_ymd_opt(start_year, 1, 1)
        .ok_or_else(|| Error::Configuration(format!("start year {} out of range", start_year)))?;
    let end = NaiveDate::from_ymd_opt(end_year, 12, 31)
        .ok_or_else(|| Error::Configuration(format!("end year {} out of range", end_year)))?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_partition_covers_range_without_gaps() {
        let start = d(2000, 1, 1);
        let end = d(2000, 3, 15);
        for size in [1, 2, 7, 50, 1000] {
            let chunks = partition(start, end, size).unwrap();
            let flat: Vec<NaiveDate> = chunks.iter().flatten().copied().collect();
            let expected: Vec<NaiveDate> = start.iter_days().take_while(|x| *x <= end).collect();
            assert_eq!(flat, expected, "size {}", size);
            assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= size));
        }
    }

    #[test]
    fn test_partition_chunk_lengths() {
        let chunks = partition(d(2001, 1, 1), d(2001, 1, 10), 4).unwrap();
        let lens: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![4, 4, 2]);
    }

    #[test]
    fn test_partition_single_day() {
        let chunks = partition(d(2002, 2, 28), d(2002, 2, 28), 50).unwrap();
        assert_eq!(chunks, vec![vec![d(2002, 2, 28)]]);
    }

    #[test]
    fn test_partition_crosses_leap_day() {
        let chunks = partition(d(2000, 2, 28), d(2000, 3, 1), 10).unwrap();
        assert_eq!(chunks[0], vec![d(2000, 2, 28), d(2000, 2, 29), d(2000, 3, 1)]);
    }

    #[test]
    fn test_partition_rejects_inverted_range() {
        let err = partition(d(2000, 1, 2), d(2000, 1, 1), 5).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_partition_rejects_zero_chunk_size() {
        let err = partition(d(2000, 1, 1), d(2000, 1, 2), 0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(year_bounds(2000, 2002).unwrap(), (d(2000, 1, 1), d(2002, 12, 31)));
        assert!(matches!(year_bounds(2003, 2002), Err(Error::Configuration(_))));
    }
}
