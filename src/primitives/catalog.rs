//! Test catalog operations.

use crate::error::Result;
use crate::types::{DefinitionPatch, NewTestDefinition, TestDefinition};
use medtrack_engine::{Database, TestCatalog};
use std::sync::Arc;

/// Test definition operations.
///
/// Access via `db.catalog`.
pub struct Catalog {
    inner: TestCatalog,
}

impl Catalog {
    pub(crate) fn new(db: Arc<Database>) -> Self {
        Self {
            inner: TestCatalog::new(db),
        }
    }

    /// Add a definition.
    ///
    /// The name is stored uppercased and must not already exist.
    pub fn add(&self, candidate: NewTestDefinition) -> Result<TestDefinition> {
        Ok(self.inner.add(candidate)?)
    }

    /// List definitions in file order; position `i` is index `i + 1`.
    pub fn list(&self) -> Result<Vec<TestDefinition>> {
        Ok(self.inner.list()?)
    }

    /// Look up a definition by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<Option<TestDefinition>> {
        Ok(self.inner.get(&name.trim().to_uppercase())?)
    }

    /// Update definition `index` (1-based).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let patch = DefinitionPatch::from_inputs("", "", "mmol/L", "");
    /// db.catalog.update(2, patch)?;
    /// ```
    pub fn update(&self, index: usize, patch: DefinitionPatch) -> Result<TestDefinition> {
        Ok(self.inner.update(index, patch)?)
    }

    /// Check `value` against the normal range of test `name`.
    pub fn evaluate_normal_range(&self, name: &str, value: f64) -> Result<bool> {
        Ok(self.inner.evaluate_normal_range(name, value)?)
    }
}
