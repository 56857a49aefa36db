//! Filtering and summary reports.

use crate::error::Result;
use crate::types::{DateRange, FilterCriteria, FilterOutcome, SummaryReport};
use medtrack_engine::{summarize, Database, ReportEngine};
use std::sync::Arc;

/// Filter and report operations.
///
/// Access via `db.reports`.
pub struct Reports {
    inner: ReportEngine,
}

impl Reports {
    pub(crate) fn new(db: Arc<Database>) -> Self {
        Self {
            inner: ReportEngine::new(db),
        }
    }

    /// Build a date range; neither bound may be in the future.
    pub fn date_range(&self, start: &str, end: &str) -> Result<DateRange> {
        Ok(self.inner.date_range(start, end)?)
    }

    /// Rows passing every criterion, with skipped malformed rows.
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<FilterOutcome> {
        Ok(self.inner.filter(criteria)?)
    }

    /// Filter, then summarize.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let report = db.reports.summary(&FilterCriteria::new().abnormal(true))?;
    /// println!("{}", report);
    /// ```
    pub fn summary(&self, criteria: &FilterCriteria) -> Result<SummaryReport> {
        Ok(summarize(&self.filter(criteria)?))
    }
}
