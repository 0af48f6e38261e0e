//! Error type for entity flows, reports and the session loop.

use airline_db::DbError;
use airline_schema::{SchemaError, TableError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Invalid table declaration: {0}")]
    Schema(#[from] SchemaError),

    /// A decoded record had no usable key value.
    #[error("{table} record has no {column}")]
    MissingKey { table: String, column: String },
}

impl AppError {
    pub fn missing_key(table: &str, column: &str) -> Self {
        Self::MissingKey {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    /// Whether storage refused the change (duplicate key, dangling reference).
    ///
    /// The session reports these and keeps going; every other error ends it.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Table(err) if err.is_constraint_violation())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        Self::Table(TableError::Db(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Table(TableError::Console(err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_constraint_errors_are_recoverable() {
        assert!(AppError::from(DbError::constraint("UNIQUE constraint failed")).is_constraint_violation());
        assert!(!AppError::from(DbError::not_found("airline.db")).is_constraint_violation());
        assert!(!AppError::from(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed"))
            .is_constraint_violation());
        assert!(!AppError::missing_key("flight", "id").is_constraint_violation());
    }

    #[test]
    fn test_missing_key_message() {
        assert_eq!(
            AppError::missing_key("pilot", "id").to_string(),
            "pilot record has no id"
        );
    }
}
