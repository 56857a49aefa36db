//! Shared handle for the two tables.
//!
//! A [`Database`] holds no rows. It only knows where the tables live,
//! whether they may be written, and which clock decides what "future" means.
//! Every manager reloads its table from disk on each call.

use std::path::Path;

use chrono::NaiveDateTime;
use medtrack_config::OpenOptions;
use medtrack_core::{validation, Result};

/// Source of the current time.
pub type Clock = fn() -> NaiveDateTime;

/// Table locations, access mode and clock.
#[derive(Debug, Clone)]
pub struct Database {
    options: OpenOptions,
    clock: Clock,
}

impl Database {
    /// Open with the given options and the local wall clock.
    pub fn open(options: OpenOptions) -> Self {
        Self {
            options,
            clock: validation::now,
        }
    }

    /// Replace the clock used for "not in the future" checks.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Options this database was opened with.
    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// Test catalog file.
    pub fn catalog_path(&self) -> &Path {
        &self.options.catalog_path
    }

    /// Patient results file.
    pub fn records_path(&self) -> &Path {
        &self.options.records_path
    }

    /// Current time according to the configured clock.
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Refuse `operation` when opened read-only.
    pub fn check_writable(&self, operation: &str) -> Result<()> {
        self.options.check_writable(operation)
    }
}
