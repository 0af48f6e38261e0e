//! Column data types and typed cell values.

use airline_db::DbValue;
use chrono::NaiveDateTime;

/// Timestamp format used for display, storage and the full-timestamp input form.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-only input form accepted by [`DataType::Date`] columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Text,
    /// Calendar date; accepts a full timestamp or a bare date.
    Date,
    /// Timestamp to the second; accepts only the full timestamp.
    DateTime,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Text => "Text",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
        }
    }

    /// Human-readable input shape, shown when input is rejected.
    pub fn input_hint(&self) -> &'static str {
        match self {
            Self::Int => "a whole number",
            Self::Text => "any text",
            Self::Date => "YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
            Self::DateTime => "YYYY-MM-DD HH:MM:SS",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed cell value.
///
/// The payload lives inside the variant, so the type tag can never disagree
/// with the payload. `None` is SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Int(Option<i64>),
    Text(Option<String>),
    Date(Option<NaiveDateTime>),
    DateTime(Option<NaiveDateTime>),
}

impl Value {
    pub fn new_text(val: impl Into<String>) -> Self {
        Self::Text(Some(val.into()))
    }

    pub fn new_int(val: i64) -> Self {
        Self::Int(Some(val))
    }

    pub fn new_date(val: NaiveDateTime) -> Self {
        Self::Date(Some(val))
    }

    pub fn new_datetime(val: NaiveDateTime) -> Self {
        Self::DateTime(Some(val))
    }

    /// NULL of the given type.
    pub fn null(data_type: DataType) -> Self {
        match data_type {
            DataType::Int => Self::Int(None),
            DataType::Text => Self::Text(None),
            DataType::Date => Self::Date(None),
            DataType::DateTime => Self::DateTime(None),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Text(_) => DataType::Text,
            Self::Date(_) => DataType::Date,
            Self::DateTime(_) => DataType::DateTime,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Self::Int(v) => v.is_none(),
            Self::Text(v) => v.is_none(),
            Self::Date(v) | Self::DateTime(v) => v.is_none(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => *v,
            _ => None,
        }
    }

    /// Display form: `NULL`, the text itself, the decimal integer, or
    /// `YYYY-MM-DD HH:MM:SS` for both date types.
    pub fn to_str(&self) -> String {
        match self {
            Self::Int(Some(v)) => v.to_string(),
            Self::Text(Some(v)) => v.clone(),
            Self::Date(Some(v)) | Self::DateTime(Some(v)) => v.format(TIMESTAMP_FORMAT).to_string(),
            Self::Int(None) | Self::Text(None) | Self::Date(None) | Self::DateTime(None) => {
                "NULL".to_string()
            }
        }
    }

    /// Bind form for SQL parameters. Dates are stored as timestamp text.
    pub fn to_db_value(&self) -> DbValue {
        match self {
            Self::Int(v) => DbValue::from(*v),
            Self::Text(v) => DbValue::from(v.clone()),
            Self::Date(v) | Self::DateTime(v) => {
                DbValue::from(v.map(|dt| dt.format(TIMESTAMP_FORMAT).to_string()))
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_str())
    }
}
