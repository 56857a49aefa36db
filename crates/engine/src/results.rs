//! Result record manager
//!
//! Appends and edits [`TestResult`] rows. Rows are keyed by
//! `(patient id, test name)`, which is not unique: an update applies to
//! every matching row.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use medtrack_core::validation::{
    check_delimiter_free, check_past_timestamp, normalize_test_name, parse_result_value,
};
use medtrack_core::{Error, Notice, PatientId, Result, Status, TestDefinition, TestResult};
use medtrack_storage::Table;
use tracing::info;

use crate::catalog::TestCatalog;
use crate::database::Database;
use crate::patch::ResultPatch;

/// Operator input for a new result row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTestResult {
    /// 7-digit patient id
    pub patient_id: String,
    /// Catalog test name, any case
    pub test_name: String,
    /// `YYYY-MM-DD hh:mm`
    pub test_date_time: String,
    /// Numeric result
    pub result_value: String,
    /// Unit label
    pub result_unit: String,
    /// Pending, Completed or Reviewed, any case
    pub status: String,
    /// `YYYY-MM-DD hh:mm`; only read when status is Completed
    pub results_date_time: Option<String>,
}

/// What an update changed.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// Number of rows rewritten
    pub updated: usize,
    /// The rows as written
    pub records: Vec<TestResult>,
    /// Malformed rows seen (and kept) during the scan
    pub notices: Vec<Notice>,
}

/// Result table operations.
#[derive(Debug, Clone)]
pub struct ResultRecords {
    db: Arc<Database>,
}

impl ResultRecords {
    /// Create a result manager over `db`.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn load(&self) -> Result<Table<TestResult>> {
        Table::load(self.db.records_path())
    }

    fn known_names(&self) -> Result<HashSet<String>> {
        Ok(TestCatalog::new(Arc::clone(&self.db))
            .list()?
            .into_iter()
            .map(|def: TestDefinition| def.name)
            .collect())
    }

    /// Validate and append a new result.
    ///
    /// Nothing is written unless every field is valid.
    pub fn add(&self, candidate: NewTestResult) -> Result<TestResult> {
        self.db.check_writable("adding a test result")?;
        let now = self.db.now();

        let patient_id: PatientId = candidate.patient_id.trim().parse()?;
        let test_name = normalize_test_name(&candidate.test_name);
        check_known(&self.known_names()?, &test_name)?;
        let test_date_time = check_past_timestamp("test date", &candidate.test_date_time, now)?;
        let result_value = parse_result_value(&candidate.result_value)?;
        let result_unit = check_delimiter_free("result unit", &candidate.result_unit)?;
        let status: Status = candidate.status.parse()?;
        let results_date_time = if status == Status::Completed {
            let raw = candidate.results_date_time.as_deref().unwrap_or_default();
            Some(check_results_time(raw, now)?)
        } else {
            None
        };

        let record = TestResult {
            patient_id,
            test_name,
            test_date_time,
            result_value,
            result_unit,
            status,
            results_date_time,
        };
        Table::append(self.db.records_path(), &record)?;
        info!(
            patient_id = %record.patient_id,
            test = %record.test_name,
            "Added test result"
        );
        Ok(record)
    }

    /// All parseable rows in file order.
    pub fn list(&self) -> Result<Vec<TestResult>> {
        Ok(self.load()?.records().cloned().collect())
    }

    /// Rows for one patient and test (test name compared case-insensitively).
    pub fn find(&self, patient_id: &str, test_name: &str) -> Result<Vec<TestResult>> {
        let wanted = normalize_test_name(test_name);
        Ok(self
            .load()?
            .records()
            .filter(|r| matches_key(r, patient_id, &wanted))
            .cloned()
            .collect())
    }

    /// Apply the same patch to every row of `(patient_id, test_name)`.
    pub fn update(
        &self,
        patient_id: &str,
        test_name: &str,
        patch: ResultPatch,
    ) -> Result<UpdateOutcome> {
        self.update_with(patient_id, test_name, |_| Ok(patch.clone()))
    }

    /// Update every row of `(patient_id, test_name)`, asking `edit` for a
    /// patch per row.
    ///
    /// Changed fields are validated with the creation rules. Any failure
    /// aborts the whole update and leaves the file untouched. Unmatched and
    /// malformed rows are written back verbatim, in order.
    pub fn update_with<F>(
        &self,
        patient_id: &str,
        test_name: &str,
        mut edit: F,
    ) -> Result<UpdateOutcome>
    where
        F: FnMut(&TestResult) -> Result<ResultPatch>,
    {
        self.db.check_writable("updating a test result")?;
        let patient_id = patient_id.trim();
        let wanted = normalize_test_name(test_name);
        let now = self.db.now();

        let mut table = self.load()?;
        let notices = table.notices();
        let mut known: Option<HashSet<String>> = None;
        let mut records = Vec::new();
        let mut changed = false;

        for entry in table.entries_mut() {
            let current = match entry.record() {
                Some(record) if matches_key(record, patient_id, &wanted) => record.clone(),
                _ => continue,
            };

            let patch = edit(&current)?;
            if patch.is_empty() {
                records.push(current);
                continue;
            }
            if patch.test_name.is_some() && known.is_none() {
                known = Some(self.known_names()?);
            }
            let updated = apply(current, patch, known.as_ref(), now)?;
            entry.replace(updated.clone());
            records.push(updated);
            changed = true;
        }

        if records.is_empty() {
            return Err(Error::NotFound(format!(
                "no record for patient {} and test {}",
                patient_id, wanted
            )));
        }

        if !changed {
            info!(patient_id, test = %wanted, "Nothing to update");
            return Ok(UpdateOutcome {
                updated: 0,
                records,
                notices,
            });
        }

        table.persist()?;
        info!(
            patient_id,
            test = %wanted,
            updated = records.len(),
            "Updated test results"
        );
        Ok(UpdateOutcome {
            updated: records.len(),
            records,
            notices,
        })
    }
}

fn matches_key(record: &TestResult, patient_id: &str, test_name: &str) -> bool {
    record.patient_id.as_str() == patient_id && record.test_name.to_uppercase() == test_name
}

fn check_known(known: &HashSet<String>, name: &str) -> Result<()> {
    if known.contains(name) {
        Ok(())
    } else {
        Err(Error::validation(
            "test name",
            format!("'{}' is not in the test catalog", name),
        ))
    }
}

fn check_results_time(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    if raw.trim().is_empty() {
        return Err(Error::validation(
            "results date",
            "required when status is Completed",
        ));
    }
    check_past_timestamp("results date", raw, now)
}

fn apply(
    current: TestResult,
    patch: ResultPatch,
    known: Option<&HashSet<String>>,
    now: NaiveDateTime,
) -> Result<TestResult> {
    let test_name = match patch.test_name {
        Some(raw) => {
            let name = normalize_test_name(&raw);
            check_known(known.unwrap_or(&HashSet::new()), &name)?;
            name
        }
        None => current.test_name,
    };
    let test_date_time = match patch.test_date_time {
        Some(raw) => check_past_timestamp("test date", &raw, now)?,
        None => current.test_date_time,
    };
    let result_value = match patch.result_value {
        Some(raw) => parse_result_value(&raw)?,
        None => current.result_value,
    };
    let result_unit = match patch.result_unit {
        Some(raw) => check_delimiter_free("result unit", &raw)?,
        None => current.result_unit,
    };
    let status = match patch.status {
        Some(raw) => raw.parse()?,
        None => current.status,
    };
    let results_date_time = match patch.results_date_time {
        Some(raw) if status == Status::Completed => Some(check_results_time(&raw, now)?),
        _ => current.results_date_time,
    };

    if status == Status::Completed && results_date_time.is_none() {
        return Err(Error::validation(
            "results date",
            "required when status is Completed",
        ));
    }

    Ok(TestResult {
        patient_id: current.patient_id,
        test_name,
        test_date_time,
        result_value,
        result_unit,
        status,
        results_date_time,
    })
}
