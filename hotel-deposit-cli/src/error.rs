use thiserror::Error;

use hotel_deposit_import::{AdminError, ImportError};

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The database could not be opened
    #[error("Could not open database at {path}: {source}")]
    Open {
        path: String,
        source: hotel_deposit_db::SchemaError,
    },

    /// A read query failed
    #[error("Database error: {0}")]
    Database(#[from] hotel_deposit_db::OperationError),

    /// An import batch failed and was rolled back
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    /// An administrative change failed
    #[error("{0}")]
    Admin(#[from] AdminError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Requested entity does not exist
    #[error("{0}")]
    NotFound(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
