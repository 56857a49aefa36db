//! Main entry point for MedTrack.
//!
//! This module provides the `MedTrack` struct, which bundles the catalog,
//! result and report operations over one pair of table files.

use crate::error::Result;
use crate::primitives::{Catalog, Reports, Results};
use chrono::NaiveDateTime;
use medtrack_config::{AccessMode, OpenOptions};
use medtrack_engine::{Clock, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A MedTrack store.
///
/// Create one with [`MedTrack::open`] or [`MedTrack::builder`].
///
/// # Example
///
/// ```ignore
/// use medtrack::prelude::*;
///
/// let db = MedTrack::builder()
///     .catalog_path("medicalTest.txt")
///     .records_path("medicalRecord.txt")
///     .open()?;
///
/// db.catalog.add(NewTestDefinition {
///     name: "hgb".into(),
///     normal_range: "> 13.8, < 17.2".into(),
///     result_unit: "g/dL".into(),
///     turnaround: "00-04-00".into(),
/// })?;
/// let report = db.reports.summary(&FilterCriteria::new().test_name("HGB"))?;
/// println!("{}", report);
/// ```
pub struct MedTrack {
    inner: Arc<Database>,

    /// Test definition operations
    pub catalog: Catalog,

    /// Patient result operations
    pub results: Results,

    /// Filtering and summary reports
    pub reports: Reports,
}

impl MedTrack {
    /// Open with the given options.
    pub fn open(options: OpenOptions) -> Result<Self> {
        Self::builder().options(options).open()
    }

    /// Create a builder.
    pub fn builder() -> MedTrackBuilder {
        MedTrackBuilder::new()
    }

    /// Test catalog file.
    pub fn catalog_path(&self) -> &Path {
        self.inner.catalog_path()
    }

    /// Patient results file.
    pub fn records_path(&self) -> &Path {
        self.inner.records_path()
    }

    /// Check if writes are refused.
    pub fn is_read_only(&self) -> bool {
        self.inner.options().is_read_only()
    }

    /// Current time according to the store's clock.
    ///
    /// Prompts should validate "not in the future" against this, not the
    /// wall clock, so they agree with the store.
    pub fn now(&self) -> NaiveDateTime {
        self.inner.now()
    }

    fn from_engine(db: Arc<Database>) -> Self {
        Self {
            catalog: Catalog::new(db.clone()),
            results: Results::new(db.clone()),
            reports: Reports::new(db.clone()),
            inner: db,
        }
    }
}

/// Builder for a [`MedTrack`] handle.
///
/// # Example
///
/// ```ignore
/// // Load medtrack.toml, then override one path
/// let db = MedTrack::builder()
///     .config_file("medtrack.toml")?
///     .records_path("/tmp/records.txt")
///     .read_only()
///     .open()?;
/// ```
pub struct MedTrackBuilder {
    options: OpenOptions,
    clock: Option<Clock>,
}

impl MedTrackBuilder {
    /// Defaults: read-write, files in the working directory.
    pub fn new() -> Self {
        Self {
            options: OpenOptions::default(),
            clock: None,
        }
    }

    /// Replace all options.
    pub fn options(mut self, options: OpenOptions) -> Self {
        self.options = options;
        self
    }

    /// Load options from a TOML file.
    pub fn config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let options = OpenOptions::from_file(path)?;
        Ok(self.options(options))
    }

    /// Set the test catalog file.
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options = self.options.catalog_path(path);
        self
    }

    /// Set the patient results file.
    pub fn records_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options = self.options.records_path(path);
        self
    }

    /// Refuse every mutating operation.
    pub fn read_only(mut self) -> Self {
        self.options = self.options.access_mode(AccessMode::ReadOnly);
        self
    }

    /// Use `clock` instead of the local wall clock for "not in the future"
    /// checks.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Open the store.
    ///
    /// Files are created lazily on first write; a missing file reads as
    /// empty.
    pub fn open(self) -> Result<MedTrack> {
        let mut db = Database::open(self.options);
        if let Some(clock) = self.clock {
            db = db.with_clock(clock);
        }
        debug!(
            catalog = %db.catalog_path().display(),
            records = %db.records_path().display(),
            read_only = db.options().is_read_only(),
            "Opened MedTrack"
        );
        Ok(MedTrack::from_engine(Arc::new(db)))
    }
}

impl Default for MedTrackBuilder {
    fn default() -> Self {
        Self::new()
    }
}
