//! Column declarations and the single rule set for turning raw input into values.
//!
//! Stored cells and keyboard input go through the same [`ColumnDef::parse_value`],
//! so whatever the console accepts is exactly what the table decodes back.

use airline_db::DbValue;
use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::error::ValidationError;
use crate::value::{DataType, Value, DATE_FORMAT, TIMESTAMP_FORMAT};

/// Literal console input meaning "set this field to NULL".
pub const NULL_SENTINEL: &str = "NULL";

/// One column of a [`crate::TableDef`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name (must match result rows exactly)
    pub name: String,

    /// Declared type
    pub data_type: DataType,

    /// Whether NULL is accepted
    pub nullable: bool,

    /// Explicit enumeration of accepted values, in display order
    pub allowed_values: Option<Vec<Value>>,
}

impl ColumnDef {
    /// Create a new required (non-nullable) column
    pub fn required(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            allowed_values: None,
        }
    }

    /// Create a new optional (nullable) column
    pub fn optional(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            allowed_values: None,
        }
    }

    /// Restrict the column to an explicit list of values
    pub fn with_allowed_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed_values = Some(values.into_iter().collect());
        self
    }

    /// Parse a raw input into a value of this column's type.
    ///
    /// `None` is an absent value and becomes NULL on nullable columns.
    pub fn parse_value(&self, raw: Option<&str>) -> Result<Value, ValidationError> {
        let Some(raw) = raw else {
            if self.nullable {
                return Ok(Value::null(self.data_type));
            }
            return Err(ValidationError::NullOnNonNullable {
                column: self.name.clone(),
            });
        };

        let value = match self.data_type {
            DataType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::new_int)
                .map_err(|_| ValidationError::InvalidInteger {
                    column: self.name.clone(),
                })?,
            DataType::Text => Value::new_text(raw),
            DataType::Date => parse_date(raw).map(Value::new_date).ok_or_else(|| {
                ValidationError::InvalidDate {
                    column: self.name.clone(),
                }
            })?,
            DataType::DateTime => parse_timestamp(raw).map(Value::new_datetime).ok_or_else(|| {
                ValidationError::InvalidDateTime {
                    column: self.name.clone(),
                }
            })?,
        };

        self.check_allowed(value)
    }

    /// Parse console input; the [`NULL_SENTINEL`] stands for an absent value.
    pub fn parse_input(&self, input: &str) -> Result<Value, ValidationError> {
        if input == NULL_SENTINEL {
            return self.parse_value(None);
        }
        self.parse_value(Some(input))
    }

    /// Parse a stored cell by its textual form.
    pub fn decode_cell(&self, cell: &DbValue) -> Result<Value, ValidationError> {
        self.parse_value(cell.as_text().as_deref())
    }

    /// Diagnostic shown when input for this column is rejected.
    pub fn describe_expected(&self, err: &ValidationError) -> Vec<String> {
        match (err, &self.allowed_values) {
            (ValidationError::NotAllowed { .. }, Some(allowed)) => {
                let mut lines =
                    vec!["Invalid input. You may only enter one of the following allowed values:".to_string()];
                lines.extend(allowed.iter().map(|v| format!("    {}", v.to_str())));
                lines
            }
            (ValidationError::NullOnNonNullable { .. }, _) => vec![format!(
                "Invalid input. Please enter a valid non-null {} value",
                self.data_type
            )],
            _ => vec![format!(
                "Invalid input. Please enter a valid {} value ({})",
                self.data_type,
                self.data_type.input_hint()
            )],
        }
    }

    fn check_allowed(&self, value: Value) -> Result<Value, ValidationError> {
        match &self.allowed_values {
            Some(allowed) if !value.is_null() && !allowed.contains(&value) => {
                Err(ValidationError::NotAllowed {
                    column: self.name.clone(),
                    value: value.to_str(),
                })
            }
            _ => Ok(value),
        }
    }
}

/// Full timestamp first, then the bare date at midnight.
fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    parse_timestamp(raw).or_else(|| {
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// `YYYY-MM-DD HH:MM:SS` with seconds in 0..=59; chrono's `%S` also admits a
/// leap second, which is stored as nanoseconds past 1e9.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .filter(|dt| dt.nanosecond() < 1_000_000_000)
}
