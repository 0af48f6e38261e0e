//! Error types for the storage layer.

use thiserror::Error;

/// Storage operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Storage errors.
///
/// Only [`DbError::Constraint`] is meant to be recoverable by the caller;
/// everything else means the connection or the environment is broken.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error (connection, prepare, step, ...)
    #[error("Database error: {0}")]
    Sqlite(rusqlite::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database file missing when it was required to exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Constraint violation (unique, foreign key, primary key, not null)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A cell could not be converted to the requested Rust type
    #[error("Type conversion error: {0}")]
    TypeConversion(String),

    /// Query returned no rows where exactly one was expected
    #[error("Query error: {0}")]
    Query(String),
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a constraint error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Whether the storage rejected a write because of a schema constraint.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == rusqlite::ffi::ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(message.unwrap_or_else(|| failure.to_string()))
            }
            other => Self::Sqlite(other),
        }
    }
}
