//! Storage error handling
//!
//! Every persistence operation fails with one of these kinds so the
//! presentation layer can tell a bad input apart from a taken identifier,
//! a stale selection, or a broken reference.

use std::io;
use std::path::PathBuf;

use rusqlite::ffi;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Malformed input, e.g. hours that are not an integer
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The user-facing printer identifier is already taken
    #[error("Printer ID '{printer_id}' is already in use")]
    Uniqueness { printer_id: String },

    /// No printer with this surrogate id
    #[error("Printer not found: {id}")]
    PrinterNotFound { id: i64 },

    /// No service log with this surrogate id
    #[error("Service log not found: {id}")]
    LogNotFound { id: i64 },

    /// Any other constraint violation reported by SQLite
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Failed to create data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Build a validation error for a named field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Classify a SQLite error raised by a write
    ///
    /// When writing a printer row, pass its `printer_id` so that UNIQUE
    /// violations become `Uniqueness`. Every other constraint violation
    /// becomes `Integrity`.
    pub fn from_sqlite(error: rusqlite::Error, printer_id: Option<&str>) -> Self {
        match (constraint_code(&error), printer_id) {
            (Some(ffi::SQLITE_CONSTRAINT_UNIQUE), Some(printer_id)) => StoreError::Uniqueness {
                printer_id: printer_id.to_string(),
            },
            (Some(_), _) => StoreError::Integrity(error.to_string()),
            (None, _) => StoreError::Database(error),
        }
    }

    /// Check if this error refers to a row that no longer exists
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::PrinterNotFound { .. } | StoreError::LogNotFound { .. }
        )
    }

    /// Check if the user can fix this by changing their input or view
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StoreError::Validation { .. }
                | StoreError::Uniqueness { .. }
                | StoreError::PrinterNotFound { .. }
                | StoreError::LogNotFound { .. }
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::Validation { .. } => Some("Correct the value and try again."),
            StoreError::Uniqueness { .. } => Some("Choose a different printer ID."),
            StoreError::PrinterNotFound { .. } | StoreError::LogNotFound { .. } => {
                Some("The entry may have been deleted. Refresh the list and try again.")
            }
            StoreError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            _ => None,
        }
    }
}

/// Extended result code of a constraint violation, if this is one
fn constraint_code(error: &rusqlite::Error) -> Option<i32> {
    match error {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(err.extended_code)
        }
        _ => None,
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
