//! Storage layer for MedTrack
//!
//! This crate implements the text table store:
//! - `lines`: raw load/save/append of newline-delimited files
//! - `table`: `Table`, an in-memory, position-keyed view of one file
//! - `format`: line codecs for the catalog and result tables

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod format;
pub mod lines;
pub mod table;

pub use format::result_line::split_patient;
pub use lines::{append_line, load_lines, load_raw_lines, save_lines};
pub use table::{Entry, Record, Table};
