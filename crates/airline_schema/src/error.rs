//! Error types for the record framework.

use airline_db::DbError;
use thiserror::Error;

/// Raw input rejected by a column's type, nullability or allow-list rules.
///
/// Always recoverable: interactive flows re-prompt the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("null on non-nullable column {column}")]
    NullOnNonNullable { column: String },

    #[error("invalid integer for {column}")]
    InvalidInteger { column: String },

    #[error("invalid date for {column}")]
    InvalidDate { column: String },

    #[error("invalid datetime for {column}")]
    InvalidDateTime { column: String },

    #[error("value {value} is not allowed for {column}")]
    NotAllowed { column: String, value: String },
}

/// A result row does not match the table it is decoded against.
///
/// Signals a schema/statement mismatch in the calling code, not bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing column {0}")]
    MissingColumn(String),

    #[error("invalid cell in column {column}: {source}")]
    InvalidCell {
        column: String,
        #[source]
        source: ValidationError,
    },
}

/// Invalid table declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate column {column} in table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("allowed value {value} for column {column} is not of type {expected}")]
    AllowedValueType {
        column: String,
        value: String,
        expected: String,
    },
}

/// Failure of a framework operation that touches storage or the console.
#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Console error: {0}")]
    Console(#[from] std::io::Error),
}

impl TableError {
    /// Storage rejected a write because of a uniqueness/key constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_constraint())
    }
}

/// Framework operation result type.
pub type Result<T> = std::result::Result<T, TableError>;
