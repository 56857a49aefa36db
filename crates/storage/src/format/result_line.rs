//! Result line:
//! `patientId: TESTNAME, YYYY-MM-DD hh:mm, value, unit, Status, [YYYY-MM-DD hh:mm]`
//!
//! The trailing results timestamp is written as an empty field, never
//! omitted, so every well-formed line has exactly six fields after the
//! patient id.

use medtrack_core::validation::{parse_result_value, parse_timestamp};
use medtrack_core::{
    format_result_value, format_timestamp, Error, PatientId, Result, Status, TestResult,
};

use super::{split_fields, FIELD_SEPARATOR, PATIENT_SEPARATOR};
use crate::table::Record;

/// Number of delimited fields after the patient id.
pub const DETAIL_FIELDS: usize = 6;

/// Split a result line into its patient id and detail text.
///
/// Used by scans that only need the key of a row.
pub fn split_patient(line: &str) -> Option<(&str, &str)> {
    line.split_once(PATIENT_SEPARATOR)
}

impl Record for TestResult {
    fn parse_line(line: &str) -> Result<Self> {
        let (id, details) =
            split_patient(line).ok_or_else(|| Error::parse(line, "missing ': ' separator"))?;

        let fields = split_fields(details);
        if fields.len() != DETAIL_FIELDS {
            return Err(Error::parse(
                line,
                format!(
                    "expected {} fields after the patient id, found {}",
                    DETAIL_FIELDS,
                    fields.len()
                ),
            ));
        }

        let patient_id: PatientId = id
            .parse()
            .map_err(|_| Error::parse(line, format!("bad patient id '{}'", id)))?;
        let test_name = fields[0];
        if test_name.is_empty() {
            return Err(Error::parse(line, "test name is empty"));
        }
        let test_date_time = parse_timestamp(fields[1])?;
        let result_value = parse_result_value(fields[2])
            .map_err(|_| Error::parse(line, format!("bad result value '{}'", fields[2])))?;
        let status: Status = fields[4]
            .parse()
            .map_err(|_| Error::parse(line, format!("bad status '{}'", fields[4])))?;
        let results_date_time = match fields[5] {
            "" => None,
            text => Some(parse_timestamp(text)?),
        };

        Ok(TestResult {
            patient_id,
            test_name: test_name.to_string(),
            test_date_time,
            result_value,
            result_unit: fields[3].to_string(),
            status,
            results_date_time,
        })
    }

    fn to_line(&self) -> String {
        let details = [
            self.test_name.clone(),
            format_timestamp(&self.test_date_time),
            format_result_value(self.result_value),
            self.result_unit.clone(),
            self.status.to_string(),
            self.results_date_time
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default(),
        ]
        .join(FIELD_SEPARATOR);
        format!("{}{}{}", self.patient_id, PATIENT_SEPARATOR, details)
    }
}
