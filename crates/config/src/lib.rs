//! Access control and configuration for MedTrack.
//!
//! This crate provides the [`AccessMode`] and [`OpenOptions`] types used to
//! decide which files back the two tables and whether they may be written.
//!
//! Options can be built in code or read from a TOML file:
//!
//! ```toml
//! catalog_path = "data/medicalTest.txt"
//! records_path = "data/medicalRecord.txt"
//! access_mode = "read-only"
//! ```

use std::path::{Path, PathBuf};

use medtrack_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default file holding test definitions.
pub const DEFAULT_CATALOG_PATH: &str = "medicalTest.txt";

/// Default file holding patient results.
pub const DEFAULT_RECORDS_PATH: &str = "medicalRecord.txt";

/// Default name of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "medtrack.toml";

/// Controls whether the tables may be written or are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// Reads and writes allowed
    #[default]
    ReadWrite,
    /// Every mutating operation is refused
    ReadOnly,
}

/// Options for opening the record tables.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use medtrack_config::{AccessMode, OpenOptions};
///
/// let opts = OpenOptions::new()
///     .records_path("/tmp/records.txt")
///     .access_mode(AccessMode::ReadOnly);
/// assert!(opts.check_writable("add result").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// Read/write permission
    pub access_mode: AccessMode,
    /// Test catalog file
    pub catalog_path: PathBuf,
    /// Patient results file
    pub records_path: PathBuf,
}

/// On-disk shape of `medtrack.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    catalog_path: Option<PathBuf>,
    records_path: Option<PathBuf>,
    access_mode: Option<AccessMode>,
}

impl OpenOptions {
    /// Defaults: read-write, files in the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the access mode.
    pub fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    /// Set the catalog file.
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = path.into();
        self
    }

    /// Set the results file.
    pub fn records_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.records_path = path.into();
        self
    }

    /// Check if writes are refused.
    pub fn is_read_only(&self) -> bool {
        self.access_mode == AccessMode::ReadOnly
    }

    /// Fail with [`Error::ReadOnly`] when `operation` would write.
    pub fn check_writable(&self, operation: &str) -> Result<()> {
        if self.is_read_only() {
            return Err(Error::ReadOnly(format!(
                "{} is not allowed in read-only mode",
                operation
            )));
        }
        Ok(())
    }

    /// Parse options from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self::default().merge(file))
    }

    /// Read options from a TOML file.
    ///
    /// Relative table paths in the file are resolved against the file's
    /// directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let mut opts = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent() {
            opts.catalog_path = resolve(base, opts.catalog_path);
            opts.records_path = resolve(base, opts.records_path);
        }
        debug!("Loaded configuration from {}", path.display());
        Ok(opts)
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(p) = file.catalog_path {
            self.catalog_path = p;
        }
        if let Some(p) = file.records_path {
            self.records_path = p;
        }
        if let Some(mode) = file.access_mode {
            self.access_mode = mode;
        }
        self
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path
    } else {
        base.join(path)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            access_mode: AccessMode::ReadWrite,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            records_path: PathBuf::from(DEFAULT_RECORDS_PATH),
        }
    }
}
