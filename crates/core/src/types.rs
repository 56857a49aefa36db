//! Core types for medical test records
//!
//! This module defines the data model shared by every layer:
//! - [`PatientId`]: 7-digit patient identifier
//! - [`Status`]: lifecycle of a test result
//! - [`Turnaround`]: expected time-to-result of a test
//! - [`TestDefinition`]: one catalog entry
//! - [`TestResult`]: one observation for one patient

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::range::NormalRange;
use crate::validation;

/// `strftime` pattern for test and results timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `strftime` pattern for calendar dates used by filters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Patient identifier: exactly seven ASCII digits.
///
/// Kept as a string so that leading zeros survive.
///
/// # Examples
///
/// ```
/// use medtrack_core::PatientId;
///
/// let id: PatientId = "0012345".parse().unwrap();
/// assert_eq!(id.as_str(), "0012345");
/// assert!("123456".parse::<PatientId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PatientId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if validation::is_seven_digit_id(s) {
            Ok(PatientId(s.to_string()))
        } else {
            Err(Error::validation(
                "patient id",
                format!("'{}' must be a 7-digit number", s),
            ))
        }
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result status.
///
/// Parsing is case-insensitive; the stored form is always capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Sample taken, no result yet
    Pending,
    /// Result available; carries a results timestamp
    Completed,
    /// Result reviewed by a clinician
    Reviewed,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Status; 3] = [Status::Pending, Status::Completed, Status::Reviewed];

    /// Capitalized stored form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Completed => "Completed",
            Status::Reviewed => "Reviewed",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::validation(
                    "status",
                    format!("'{}' must be one of Pending, Completed, Reviewed", s),
                )
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected turnaround of a test, stored as `DD-hh-mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turnaround {
    /// Days, 0..=31
    pub days: u32,
    /// Hours, 0..=23
    pub hours: u32,
    /// Minutes, 0..=59
    pub minutes: u32,
}

impl Turnaround {
    /// Build a turnaround, rejecting out-of-range components.
    pub fn new(days: u32, hours: u32, minutes: u32) -> Result<Self> {
        validation::check_turnaround(days, hours, minutes)?;
        Ok(Turnaround {
            days,
            hours,
            minutes,
        })
    }
}

impl FromStr for Turnaround {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (days, hours, minutes) = validation::parse_turnaround(s)?;
        Turnaround::new(days, hours, minutes)
    }
}

impl fmt::Display for Turnaround {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:02}", self.days, self.hours, self.minutes)
    }
}

/// A kind of medical test in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Uppercase unique name
    pub name: String,
    /// Range expression text, e.g. `> 13.8, < 17.2`
    pub normal_range: String,
    /// Unit label
    pub result_unit: String,
    /// Expected time-to-result
    pub turnaround: Turnaround,
}

impl TestDefinition {
    /// Parse the stored range expression into comparator terms.
    pub fn range(&self) -> Result<NormalRange> {
        self.normal_range.parse()
    }
}

/// One observation for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Patient the result belongs to
    pub patient_id: PatientId,
    /// Catalog name of the test (uppercase)
    pub test_name: String,
    /// When the test was taken
    pub test_date_time: NaiveDateTime,
    /// Measured value
    pub result_value: f64,
    /// Unit label as entered
    pub result_unit: String,
    /// Lifecycle status
    pub status: Status,
    /// When the result became available; only required for Completed
    pub results_date_time: Option<NaiveDateTime>,
}

impl TestResult {
    /// Minutes between the test and its result, if the result time is known.
    pub fn turnaround_minutes(&self) -> Option<i64> {
        self.results_date_time
            .map(|done| (done - self.test_date_time).num_minutes())
    }
}

/// Render a timestamp in the stored `YYYY-MM-DD hh:mm` form.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a measured value the way the result table stores it.
///
/// Integral values keep one decimal place (`15` is written `15.0`).
pub fn format_result_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
