//! On-disk line formats for both tables.
//!
//! - `catalog_line`: `NAME, normalRange, resultUnit, DD-hh-mm`
//! - `result_line`: `patientId: TESTNAME, testDateTime, result, resultUnit, Status, resultsDateTime`

pub mod catalog_line;
pub mod result_line;

/// Separator between the patient id and the rest of a result line.
pub const PATIENT_SEPARATOR: &str = ": ";

/// Separator used when writing fields.
pub const FIELD_SEPARATOR: &str = ", ";

/// Split on the field delimiter and trim each piece.
pub(crate) fn split_fields(s: &str) -> Vec<&str> {
    s.split(',').map(str::trim).collect()
}
