//! Per-run record of dates whose archive index could not be fetched.

use chrono::NaiveDate;
use std::collections::HashSet;

/// Dates that failed during this process. Grows monotonically, never persisted;
/// a new run starts empty and retries them.
#[derive(Debug, Default)]
pub struct ErrorTracker {
    dates: HashSet<NaiveDate>,
}

impl ErrorTracker {
    /// Record `date` as failed. Marking twice is a no-op.
    pub fn mark(&mut self, date: NaiveDate) {
        self.dates.insert(date);
    }

    /// Whether `date` failed earlier in this run.
    pub fn is_marked(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Marked dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.dates.iter().copied().collect();
        dates.sort();
        dates
    }
}
