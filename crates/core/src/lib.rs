//! Core types for MedTrack
//!
//! - [`types`]: the record model (definitions, results, statuses)
//! - [`range`]: normal-range parsing and evaluation
//! - [`validation`]: input rules shared by every manager
//! - [`error`]: the error taxonomy and scan notices

#![warn(missing_docs)]

pub mod error;
pub mod range;
pub mod types;
pub mod validation;

pub use error::{Error, Notice, Result};
pub use range::{evaluate_normal_range, Comparator, NormalRange, RangeTerm};
pub use types::{
    format_result_value, format_timestamp, PatientId, Status, TestDefinition, TestResult,
    Turnaround, DATE_FORMAT, TIMESTAMP_FORMAT,
};
