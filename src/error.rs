//! Unified error type for MedTrack.
//!
//! Wraps the errors of the internal crates and presents one interface to
//! callers of the facade.

use thiserror::Error;

/// All MedTrack errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Operator input rejected
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Field that failed validation
        field: String,
        /// Human-readable reason
        reason: String,
    },

    /// Definition index or patient/test combination not found
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored line could not be read
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// Mutation attempted on a read-only database
    #[error("read-only: {0}")]
    ReadOnly(String),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for MedTrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if operator input was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Invalid { .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if a write was refused because the database is read-only.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Error::ReadOnly(_))
    }
}

impl From<medtrack_core::Error> for Error {
    fn from(e: medtrack_core::Error) -> Self {
        use medtrack_core::Error as CoreError;
        match e {
            CoreError::Validation { field, reason } => Error::Invalid {
                field: field.to_string(),
                reason,
            },
            CoreError::NotFound(what) => Error::NotFound(what),
            CoreError::Parse { input, reason } => {
                Error::Corrupt(format!("'{}': {}", input, reason))
            }
            CoreError::ReadOnly(msg) => Error::ReadOnly(msg),
            CoreError::Config(msg) => Error::Config(msg),
            CoreError::Io(io_err) => Error::Io(io_err),
        }
    }
}
