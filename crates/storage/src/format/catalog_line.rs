//! Catalog line: `NAME, normalRange, resultUnit, DD-hh-mm`
//!
//! The normal range may itself contain the delimiter (`> 13.8, < 17.2`), so
//! fields are taken from both ends: name first, turnaround last, unit second
//! to last, and everything in between is the range.

use medtrack_core::{Error, Result, TestDefinition, Turnaround};

use super::{split_fields, FIELD_SEPARATOR};
use crate::table::Record;

/// Minimum number of delimited fields in a catalog line.
pub const MIN_FIELDS: usize = 4;

impl Record for TestDefinition {
    fn parse_line(line: &str) -> Result<Self> {
        let fields = split_fields(line);
        if fields.len() < MIN_FIELDS {
            return Err(Error::parse(
                line,
                format!(
                    "expected at least {} fields, found {}",
                    MIN_FIELDS,
                    fields.len()
                ),
            ));
        }

        let last = fields.len() - 1;
        let name = fields[0];
        if name.is_empty() {
            return Err(Error::parse(line, "test name is empty"));
        }
        let turnaround: Turnaround = fields[last].parse()?;
        let result_unit = fields[last - 1];
        let normal_range = fields[1..last - 1].join(FIELD_SEPARATOR);
        if normal_range.is_empty() {
            return Err(Error::parse(line, "normal range is empty"));
        }

        Ok(TestDefinition {
            name: name.to_string(),
            normal_range,
            result_unit: result_unit.to_string(),
            turnaround,
        })
    }

    fn to_line(&self) -> String {
        let turnaround = self.turnaround.to_string();
        [
            self.name.as_str(),
            self.normal_range.as_str(),
            self.result_unit.as_str(),
            turnaround.as_str(),
        ]
        .join(FIELD_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_term_range() {
        let def = TestDefinition::parse_line("HGB, > 13.8, < 17.2, g/dL, 00-04-00").unwrap();
        assert_eq!(def.name, "HGB");
        assert_eq!(def.normal_range, "> 13.8, < 17.2");
        assert_eq!(def.result_unit, "g/dL");
        assert_eq!(def.turnaround, Turnaround::new(0, 4, 0).unwrap());
    }

    #[test]
    fn test_parse_one_term_range() {
        let def = TestDefinition::parse_line("LDL, < 100, mg/dL, 01-00-30").unwrap();
        assert_eq!(def.normal_range, "< 100");
        assert_eq!(def.turnaround.days, 1);
        assert_eq!(def.turnaround.minutes, 30);
    }

    #[test]
    fn test_encode_matches_stored_form() {
        let def = TestDefinition {
            name: "BGT".to_string(),
            normal_range: "> 70, < 99".to_string(),
            result_unit: "mg/dL".to_string(),
            turnaround: Turnaround::new(0, 1, 15).unwrap(),
        };
        assert_eq!(def.to_line(), "BGT, > 70, < 99, mg/dL, 00-01-15");
        assert_eq!(TestDefinition::parse_line(&def.to_line()).unwrap(), def);
    }

    #[test]
    fn test_rejects_short_or_bad_lines() {
        assert!(TestDefinition::parse_line("HGB, < 100, g/dL").is_err());
        assert!(TestDefinition::parse_line("").is_err());
        assert!(TestDefinition::parse_line("HGB, < 100, g/dL, 4 hours").is_err());
        assert!(TestDefinition::parse_line("HGB, < 100, g/dL, 00-25-00").is_err());
        assert!(TestDefinition::parse_line(", < 100, g/dL, 00-01-00").is_err());
    }
}
