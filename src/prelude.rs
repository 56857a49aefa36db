//! Convenient imports for MedTrack.
//!
//! ```ignore
//! use medtrack::prelude::*;
//!
//! let db = MedTrack::open(OpenOptions::new())?;
//! let tests = db.catalog.list()?;
//! ```

// Main entry point
pub use crate::database::{MedTrack, MedTrackBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Configuration
pub use crate::types::{AccessMode, OpenOptions};

// Records
pub use crate::types::{PatientId, Status, TestDefinition, TestResult, Turnaround};

// Operation inputs
pub use crate::types::{
    DefinitionPatch, FilterCriteria, NewTestDefinition, NewTestResult, ResultPatch,
    TurnaroundRange,
};

// Operation outputs
pub use crate::types::{FilterOutcome, Notice, SummaryReport, UpdateOutcome};
