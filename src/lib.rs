//! # MedTrack
//!
//! Flat-file tracking of medical test definitions and patient results.
//!
//! MedTrack keeps two newline-delimited text tables: a catalog of test
//! definitions (`medicalTest.txt`) and a table of patient results
//! (`medicalRecord.txt`). It validates every write, preserves rows it cannot
//! parse, and produces filtered summary reports.
//!
//! ## Quick Start
//!
//! ```ignore
//! use medtrack::prelude::*;
//!
//! let db = MedTrack::builder().records_path("./records.txt").open()?;
//!
//! db.results.add(NewTestResult {
//!     patient_id: "1234567".into(),
//!     test_name: "hgb".into(),
//!     test_date_time: "2024-05-01 08:00".into(),
//!     result_value: "15".into(),
//!     result_unit: "g/dL".into(),
//!     status: "pending".into(),
//!     results_date_time: None,
//! })?;
//!
//! let outcome = db.reports.filter(&FilterCriteria::new().abnormal(true))?;
//! ```
//!
//! ## Operation groups
//!
//! - [`Catalog`] - test definitions: add, list, update by index
//! - [`Results`] - patient results: add, list, update by patient and test
//! - [`Reports`] - filter and summarize results

#![warn(missing_docs)]

mod database;
mod error;
mod primitives;
mod types;

pub mod prelude;

// Re-export main entry points
pub use database::{MedTrack, MedTrackBuilder};
pub use error::{Error, Result};

// Re-export operation groups
pub use primitives::{Catalog, Reports, Results};

// Re-export types
pub use types::*;
