//! Session state and command execution.

use medtrack::{
    Error, FilterCriteria, FilterOutcome, MedTrack, PatientId, Status, SummaryReport,
    TestDefinition, TestResult, TurnaroundRange, UpdateOutcome,
};

use crate::parse::{Action, FilterArgs};

/// What a command produced.
#[derive(Debug)]
pub enum Output {
    /// A definition was added or updated
    Definition(TestDefinition),
    /// Catalog listing, in index order
    Definitions(Vec<TestDefinition>),
    /// A result was added
    Result(TestResult),
    /// Result listing
    Results(Vec<TestResult>),
    /// Rows rewritten by an update
    Updated(UpdateOutcome),
    /// Filter summary
    Report {
        report: SummaryReport,
        outcome: FilterOutcome,
    },
}

/// An open store for the lifetime of one CLI process.
pub struct SessionState {
    db: MedTrack,
}

impl SessionState {
    pub fn new(db: MedTrack) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &MedTrack {
        &self.db
    }

    /// Run one action against the store.
    pub fn execute(&self, action: Action) -> Result<Output, Error> {
        match action {
            Action::AddDefinition(candidate) => {
                Ok(Output::Definition(self.db.catalog.add(candidate)?))
            }
            Action::ListDefinitions => Ok(Output::Definitions(self.db.catalog.list()?)),
            Action::UpdateDefinition { index, patch } => {
                Ok(Output::Definition(self.db.catalog.update(index, patch)?))
            }
            Action::AddResult(candidate) => Ok(Output::Result(self.db.results.add(candidate)?)),
            Action::ListResults {
                patient_id,
                test_name,
            } => {
                let rows = self.db.results.list()?;
                let wanted_name = test_name.map(|n| n.trim().to_uppercase());
                Ok(Output::Results(
                    rows.into_iter()
                        .filter(|r| {
                            patient_id
                                .as_deref()
                                .map_or(true, |id| r.patient_id.as_str() == id.trim())
                        })
                        .filter(|r| {
                            wanted_name
                                .as_deref()
                                .map_or(true, |n| r.test_name.to_uppercase() == n)
                        })
                        .collect(),
                ))
            }
            Action::UpdateResults {
                patient_id,
                test_name,
                patch,
            } => Ok(Output::Updated(
                self.db.results.update(&patient_id, &test_name, patch)?,
            )),
            Action::Filter(args) => {
                let criteria = self.criteria(&args)?;
                self.report(&criteria)
            }
        }
    }

    /// Filter and summarize.
    pub fn report(&self, criteria: &FilterCriteria) -> Result<Output, Error> {
        let outcome = self.db.reports.filter(criteria)?;
        let report = medtrack::summarize(&outcome);
        Ok(Output::Report { report, outcome })
    }

    /// Validate raw filter arguments into criteria.
    pub fn criteria(&self, args: &FilterArgs) -> Result<FilterCriteria, Error> {
        let mut criteria = FilterCriteria::new().abnormal(args.abnormal);
        if let Some(id) = &args.patient_id {
            criteria = criteria.patient_id(id.trim().parse::<PatientId>()?);
        }
        if let Some(name) = &args.test_name {
            criteria = criteria.test_name(name);
        }
        if let Some((start, end)) = &args.dates {
            criteria = criteria.date_range(self.db.reports.date_range(start, end)?);
        }
        if let Some(status) = &args.status {
            criteria = criteria.status(status.parse::<Status>()?);
        }
        if let Some((min, max)) = &args.turnaround {
            criteria = criteria.turnaround_range(TurnaroundRange::parse(min, max)?);
        }
        Ok(criteria)
    }
}
