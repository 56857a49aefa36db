//! Test catalog manager
//!
//! Creates, lists and edits [`TestDefinition`]s. Definitions are never
//! deleted. Names are unique; the duplicate check is an exact match on the
//! uppercase name, with stored names uppercased too in case the file was
//! edited by hand.

use std::sync::Arc;

use medtrack_core::validation::{check_required_text, check_test_name};
use medtrack_core::{evaluate_normal_range, Error, NormalRange, Result, TestDefinition, Turnaround};
use medtrack_storage::Table;
use tracing::info;

use crate::database::Database;
use crate::patch::DefinitionPatch;

/// Operator input for a new catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTestDefinition {
    /// Test name; stored uppercased
    pub name: String,
    /// Normal range expression
    pub normal_range: String,
    /// Result unit
    pub result_unit: String,
    /// Turnaround, `DD-hh-mm`
    pub turnaround: String,
}

/// Catalog operations.
#[derive(Debug, Clone)]
pub struct TestCatalog {
    db: Arc<Database>,
}

impl TestCatalog {
    /// Create a catalog manager over `db`.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn load(&self) -> Result<Table<TestDefinition>> {
        Table::load(self.db.catalog_path())
    }

    /// Validate and append a new definition.
    ///
    /// Rejects an empty or numeric name, a name already in the catalog, an
    /// empty or unparsable range, an empty unit and a bad turnaround.
    pub fn add(&self, candidate: NewTestDefinition) -> Result<TestDefinition> {
        self.db.check_writable("adding a test definition")?;

        let name = check_test_name(&candidate.name)?;
        let table = self.load()?;
        if stored_names(&table).any(|stored| stored.to_uppercase() == name) {
            return Err(Error::validation(
                "test name",
                format!("'{}' already exists", name),
            ));
        }

        let definition = TestDefinition {
            name,
            normal_range: check_normal_range(&candidate.normal_range)?,
            result_unit: check_required_text("result unit", &candidate.result_unit)?,
            turnaround: check_turnaround_text(&candidate.turnaround)?,
        };

        Table::append(self.db.catalog_path(), &definition)?;
        info!(name = %definition.name, "Added test definition");
        Ok(definition)
    }

    /// All parseable definitions in file order.
    ///
    /// Position `i` in the returned vector is display index `i + 1`.
    pub fn list(&self) -> Result<Vec<TestDefinition>> {
        Ok(self.load()?.records().cloned().collect())
    }

    /// Look up a definition by exact stored name.
    pub fn get(&self, name: &str) -> Result<Option<TestDefinition>> {
        Ok(self.load()?.records().find(|d| d.name == name).cloned())
    }

    /// Check if `name` exactly matches a stored (uppercase) test name.
    pub fn is_known_test_name(&self, name: &str) -> Result<bool> {
        Ok(self.load()?.records().any(|d| d.name == name))
    }

    /// Overwrite the supplied fields of definition `index` (1-based).
    ///
    /// Fields left `None` keep their current value. The whole file is
    /// rewritten in its original order.
    pub fn update(&self, index: usize, patch: DefinitionPatch) -> Result<TestDefinition> {
        self.db.check_writable("updating a test definition")?;

        let mut table = self.load()?;
        let positions: Vec<usize> = table
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_malformed())
            .map(|(pos, _)| pos)
            .collect();

        if index == 0 || index > positions.len() {
            return Err(Error::NotFound(format!(
                "test definition #{} (catalog has {})",
                index,
                positions.len()
            )));
        }
        let position = positions[index - 1];

        let current = table.entries()[position]
            .record()
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("test definition #{}", index)))?;
        if patch.is_empty() {
            info!(index, "Nothing to update");
            return Ok(current);
        }
        let updated = apply(&table, position, current, patch)?;

        table.entries_mut()[position].replace(updated.clone());
        table.persist()?;
        info!(index, name = %updated.name, "Updated test definition");
        Ok(updated)
    }

    /// Check `value` against the normal range of test `name`.
    ///
    /// Returns `NotFound` when the catalog has no such test.
    pub fn evaluate_normal_range(&self, name: &str, value: f64) -> Result<bool> {
        let name = name.trim().to_uppercase();
        let definition = self
            .load()?
            .records()
            .find(|d| d.name.to_uppercase() == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("test definition {}", name)))?;
        evaluate_normal_range(value, &definition.normal_range)
    }
}

fn apply(
    table: &Table<TestDefinition>,
    position: usize,
    current: TestDefinition,
    patch: DefinitionPatch,
) -> Result<TestDefinition> {
    let name = match patch.name {
        Some(raw) => {
            let name = check_test_name(&raw)?;
            let taken = table
                .entries()
                .iter()
                .enumerate()
                .filter(|(pos, _)| *pos != position)
                .filter_map(|(_, entry)| entry.record())
                .any(|other| other.name.to_uppercase() == name);
            if taken {
                return Err(Error::validation(
                    "test name",
                    format!("'{}' already exists", name),
                ));
            }
            name
        }
        None => current.name,
    };

    Ok(TestDefinition {
        name,
        normal_range: match patch.normal_range {
            Some(raw) => check_normal_range(&raw)?,
            None => current.normal_range,
        },
        result_unit: match patch.result_unit {
            Some(raw) => check_required_text("result unit", &raw)?,
            None => current.result_unit,
        },
        turnaround: match patch.turnaround {
            Some(raw) => check_turnaround_text(&raw)?,
            None => current.turnaround,
        },
    })
}

// Malformed lines still reserve their leading name.
fn stored_names(table: &Table<TestDefinition>) -> impl Iterator<Item = String> + '_ {
    table.entries().iter().map(|entry| match entry.record() {
        Some(def) => def.name.clone(),
        None => entry
            .line()
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
    })
}

fn check_normal_range(raw: &str) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Error::validation("normal range", "cannot be empty"));
    }
    if text.contains('\n') || text.contains('\r') {
        return Err(Error::validation("normal range", "may not contain line breaks"));
    }
    text.parse::<NormalRange>()
        .map_err(|e| Error::validation("normal range", e.to_string()))?;
    Ok(text.to_string())
}

fn check_turnaround_text(raw: &str) -> Result<Turnaround> {
    raw.parse::<Turnaround>().map_err(|e| match e {
        Error::Parse { reason, .. } => Error::validation("turnaround", reason),
        other => other,
    })
}
