//! Error types for the parcel tracker.

use thiserror::Error;

/// Result type alias for parcel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the parcel tracker
#[derive(Error, Debug)]
pub enum Error {
    /// No row with the requested number
    #[error("parcel {0} not found")]
    NotFound(i64),

    /// Any other SQLite failure (I/O, malformed statement, constraint)
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Status string outside the known lifecycle
    #[error("unknown parcel status: {0}")]
    UnknownStatus(String),

    /// Parcel is already in its last status
    #[error("parcel {0} is already delivered")]
    FinalStatus(i64),

    /// Operation is only allowed while the parcel is registered
    #[error("parcel {number} has status {status}, expected registered")]
    NotRegistered {
        /// Parcel number
        number: i64,
        /// Current status
        status: String,
    },
}

impl Error {
    /// Returns true when the error means the parcel row is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
