//! Record managers for MedTrack
//!
//! This crate implements the operations over the two tables:
//! - `catalog`: add, list and update test definitions
//! - `results`: add, list and update patient results
//! - `filter`: single-scan filtering of results
//! - `report`: summary statistics over a filter outcome
//!
//! All managers share one [`Database`] handle and reload their table from
//! disk on every call.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod database;
pub mod filter;
pub mod patch;
pub mod report;
pub mod results;

pub use catalog::{NewTestDefinition, TestCatalog};
pub use database::{Clock, Database};
pub use filter::{DateRange, FilterCriteria, FilterOutcome, ReportEngine, TurnaroundRange};
pub use patch::{keep_if_blank, DefinitionPatch, ResultPatch};
pub use report::{summarize, Stats, SummaryReport};
pub use results::{NewTestResult, ResultRecords, UpdateOutcome};
