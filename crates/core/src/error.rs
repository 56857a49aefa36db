//! Error taxonomy shared by every MedTrack crate.
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | Validation | Operator input is malformed or out of range |
//! | NotFound | Missing file, definition index, or patient/test combination |
//! | Parse | A stored line does not have the expected shape |
//! | ReadOnly | A mutation was attempted on a read-only handle |
//! | Config | Configuration file could not be used |
//! | Io | Underlying file I/O failed |

use std::fmt;

use thiserror::Error;

/// All MedTrack core errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Field that failed validation
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// Entity not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored line does not match the expected shape
    #[error("cannot parse '{input}': {reason}")]
    Parse {
        /// Offending text
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// Mutation attempted through a read-only handle
    #[error("read-only: {0}")]
    ReadOnly(String),

    /// Configuration file is unreadable or invalid
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for MedTrack core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for a parse failure.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}

/// A non-fatal problem found while scanning a table.
///
/// Scans never abort on a bad row; they record a notice and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// 1-based line number in the source file
    pub line_number: usize,
    /// The raw line
    pub line: String,
    /// Why the line was skipped
    pub reason: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skipping malformed record at line {}: {} ({})",
            self.line_number, self.line, self.reason
        )
    }
}
