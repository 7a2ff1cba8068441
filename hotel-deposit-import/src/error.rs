//! Import error taxonomy.

use hotel_deposit_db::{OperationError, SchemaError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// A record lacks a required field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store rejected a write (uniqueness, CHECK, NOT NULL, foreign key).
    #[error("Constraint violation: {0}")]
    Conflict(OperationError),

    /// The database could not be opened.
    #[error("Could not open database: {0}")]
    Resource(#[from] SchemaError),

    /// The input file is malformed as a whole.
    #[error("Format error: {0}")]
    Format(String),

    /// Any other storage failure.
    #[error("Database error: {0}")]
    Database(OperationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

impl From<OperationError> for ImportError {
    fn from(e: OperationError) -> Self {
        if e.is_constraint_violation() {
            Self::Conflict(e)
        } else {
            Self::Database(e)
        }
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(e: rusqlite::Error) -> Self {
        OperationError::from(e).into()
    }
}
