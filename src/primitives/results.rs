//! Patient result operations.

use crate::error::Result;
use crate::types::{NewTestResult, ResultPatch, TestResult, UpdateOutcome};
use medtrack_engine::{Database, ResultRecords};
use std::sync::Arc;

/// Patient result operations.
///
/// Access via `db.results`.
pub struct Results {
    inner: ResultRecords,
}

impl Results {
    pub(crate) fn new(db: Arc<Database>) -> Self {
        Self {
            inner: ResultRecords::new(db),
        }
    }

    /// Add a result; the test name must be in the catalog.
    pub fn add(&self, candidate: NewTestResult) -> Result<TestResult> {
        Ok(self.inner.add(candidate)?)
    }

    /// List results in file order.
    pub fn list(&self) -> Result<Vec<TestResult>> {
        Ok(self.inner.list()?)
    }

    /// Results for one patient and test.
    pub fn find(&self, patient_id: &str, test_name: &str) -> Result<Vec<TestResult>> {
        Ok(self.inner.find(patient_id, test_name)?)
    }

    /// Apply `patch` to every result of `(patient_id, test_name)`.
    pub fn update(
        &self,
        patient_id: &str,
        test_name: &str,
        patch: ResultPatch,
    ) -> Result<UpdateOutcome> {
        Ok(self.inner.update(patient_id, test_name, patch)?)
    }

    /// Update every result of `(patient_id, test_name)` with a patch built
    /// per row.
    ///
    /// Errors returned by `edit` abort the update before anything is written.
    pub fn update_with<F>(
        &self,
        patient_id: &str,
        test_name: &str,
        edit: F,
    ) -> Result<UpdateOutcome>
    where
        F: FnMut(&TestResult) -> medtrack_core::Result<ResultPatch>,
    {
        Ok(self.inner.update_with(patient_id, test_name, edit)?)
    }
}
