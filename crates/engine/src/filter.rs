//! Filter engine
//!
//! Scans the result table once and keeps the rows that pass every supplied
//! criterion. An absent criterion matches everything.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use medtrack_core::validation::{check_past_date, normalize_test_name};
use medtrack_core::{Error, NormalRange, Notice, PatientId, Result, Status, TestResult};
use medtrack_storage::Table;
use serde::Serialize;
use tracing::debug;

use crate::catalog::TestCatalog;
use crate::database::Database;

// ============================================================================
// Criteria
// ============================================================================

/// Inclusive range of test dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Parse both `YYYY-MM-DD` bounds.
    ///
    /// Neither bound may lie after `now`, and `start` may not follow `end`.
    pub fn new(start: &str, end: &str, now: NaiveDateTime) -> Result<Self> {
        let start = check_past_date("start date", start.trim(), now)?;
        let end = check_past_date("end date", end.trim(), now)?;
        if start > end {
            return Err(Error::validation(
                "date range",
                format!("start {} is after end {}", start, end),
            ));
        }
        Ok(DateRange { start, end })
    }

    /// First day included.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day included.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check whether the date part of `ts` falls inside the range.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let day = ts.date();
        self.start <= day && day <= self.end
    }
}

/// Inclusive range of turnaround minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnaroundRange {
    min: i64,
    max: i64,
}

impl TurnaroundRange {
    /// Both bounds must be non-negative and `min <= max`.
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min < 0 || max < 0 {
            return Err(Error::validation(
                "turnaround range",
                "minutes cannot be negative",
            ));
        }
        if min > max {
            return Err(Error::validation(
                "turnaround range",
                format!("minimum {} is greater than maximum {}", min, max),
            ));
        }
        Ok(TurnaroundRange { min, max })
    }

    /// Parse both bounds from operator text.
    pub fn parse(min: &str, max: &str) -> Result<Self> {
        let parse = |s: &str| {
            s.trim().parse::<i64>().map_err(|_| {
                Error::validation(
                    "turnaround range",
                    format!("'{}' must be a whole number of minutes", s.trim()),
                )
            })
        };
        Self::new(parse(min)?, parse(max)?)
    }

    /// Lower bound, minutes.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound, minutes.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Check whether `minutes` lies inside the range.
    pub fn contains(&self, minutes: i64) -> bool {
        self.min <= minutes && minutes <= self.max
    }
}

/// Conjunction of optional criteria.
///
/// # Example
///
/// ```
/// use medtrack_engine::FilterCriteria;
/// use medtrack_core::Status;
///
/// let criteria = FilterCriteria::new()
///     .test_name("hgb")
///     .status(Status::Completed)
///     .abnormal(true);
/// assert!(!criteria.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Exact patient id
    pub patient_id: Option<PatientId>,
    /// Test name, compared case-insensitively
    pub test_name: Option<String>,
    /// Keep only values outside the test's normal range
    pub abnormal: bool,
    /// Test date window
    pub date_range: Option<DateRange>,
    /// Exact status
    pub status: Option<Status>,
    /// Turnaround window in minutes
    pub turnaround_range: Option<TurnaroundRange>,
}

impl FilterCriteria {
    /// No criteria: every parseable row matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one patient.
    pub fn patient_id(mut self, id: PatientId) -> Self {
        self.patient_id = Some(id);
        self
    }

    /// Restrict to one test.
    pub fn test_name(mut self, name: impl AsRef<str>) -> Self {
        self.test_name = Some(normalize_test_name(name.as_ref()));
        self
    }

    /// Keep only abnormal results.
    pub fn abnormal(mut self, abnormal: bool) -> Self {
        self.abnormal = abnormal;
        self
    }

    /// Restrict to a test date window.
    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Restrict to one status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to a turnaround window.
    pub fn turnaround_range(mut self, range: TurnaroundRange) -> Self {
        self.turnaround_range = Some(range);
        self
    }

    /// Check if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.patient_id.is_none()
            && self.test_name.is_none()
            && !self.abnormal
            && self.date_range.is_none()
            && self.status.is_none()
            && self.turnaround_range.is_none()
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Rows that survived a filter, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOutcome {
    /// Raw lines as stored
    pub rows: Vec<String>,
    /// Parsed rows
    pub records: Vec<TestResult>,
    /// Result values of the surviving rows
    pub values: Vec<f64>,
    /// Turnaround minutes; only filled when a turnaround range was given
    pub turnarounds: Vec<i64>,
    /// Malformed rows skipped during the scan
    #[serde(skip)]
    pub notices: Vec<Notice>,
}

impl FilterOutcome {
    /// Number of surviving rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Runs filters over the result table.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    db: Arc<Database>,
}

impl ReportEngine {
    /// Create a report engine over `db`.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Build a date range checked against this database's clock.
    pub fn date_range(&self, start: &str, end: &str) -> Result<DateRange> {
        DateRange::new(start, end, self.db.now())
    }

    /// Scan the result table once and keep rows passing every criterion.
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<FilterOutcome> {
        let table: Table<TestResult> = Table::load(self.db.records_path())?;
        let ranges = if criteria.abnormal {
            self.normal_ranges()?
        } else {
            HashMap::new()
        };

        let mut outcome = FilterOutcome::default();
        for entry in table.entries() {
            let record = match entry.record() {
                Some(record) => record,
                None => {
                    outcome.notices.extend(entry.notice());
                    continue;
                }
            };

            if !passes_fixed(record, criteria) {
                continue;
            }
            if criteria.abnormal && !is_abnormal(record, &ranges) {
                continue;
            }
            if let Some(range) = &criteria.turnaround_range {
                match record.turnaround_minutes() {
                    Some(minutes) if range.contains(minutes) => outcome.turnarounds.push(minutes),
                    _ => continue,
                }
            }

            outcome.rows.push(entry.line().to_string());
            outcome.values.push(record.result_value);
            outcome.records.push(record.clone());
        }

        debug!(
            matched = outcome.rows.len(),
            skipped = outcome.notices.len(),
            "Filtered test results"
        );
        Ok(outcome)
    }

    // Definitions whose range does not parse are left out, so their rows
    // are never excluded as abnormal.
    fn normal_ranges(&self) -> Result<HashMap<String, NormalRange>> {
        let definitions = TestCatalog::new(Arc::clone(&self.db)).list()?;
        Ok(definitions
            .into_iter()
            .filter_map(|def| match def.range() {
                Ok(range) => Some((def.name, range)),
                Err(e) => {
                    debug!(test = %def.name, error = %e, "Ignoring unparsable normal range");
                    None
                }
            })
            .collect())
    }
}

fn passes_fixed(record: &TestResult, criteria: &FilterCriteria) -> bool {
    if let Some(id) = &criteria.patient_id {
        if &record.patient_id != id {
            return false;
        }
    }
    if let Some(name) = &criteria.test_name {
        if &record.test_name.to_uppercase() != name {
            return false;
        }
    }
    if let Some(range) = &criteria.date_range {
        if !range.contains(&record.test_date_time) {
            return false;
        }
    }
    if let Some(status) = criteria.status {
        if record.status != status {
            return false;
        }
    }
    true
}

fn is_abnormal(record: &TestResult, ranges: &HashMap<String, NormalRange>) -> bool {
    match ranges.get(&record.test_name.to_uppercase()) {
        Some(range) => !range.contains(record.result_value),
        None => true,
    }
}
