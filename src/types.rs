//! Public types for the MedTrack API.
//!
//! This module re-exports types from the internal crates with a single path.

// Records
pub use medtrack_core::{PatientId, Status, TestDefinition, TestResult, Turnaround};

// Normal ranges
pub use medtrack_core::{evaluate_normal_range, Comparator, NormalRange, RangeTerm};

// Scan notices
pub use medtrack_core::Notice;

// Timestamp formatting
pub use medtrack_core::{format_result_value, format_timestamp, DATE_FORMAT, TIMESTAMP_FORMAT};

// Configuration
pub use medtrack_config::{AccessMode, OpenOptions};

// Operation inputs and outputs
pub use medtrack_engine::{
    keep_if_blank, Clock, DateRange, DefinitionPatch, FilterCriteria, FilterOutcome,
    NewTestDefinition, NewTestResult, ResultPatch, Stats, SummaryReport, TurnaroundRange,
    UpdateOutcome,
};

// Reporting
pub use medtrack_engine::summarize;
