//! Decoded rows.

use crate::value::Value;

/// A decoded row: one value per declared column, in declared order.
///
/// Only [`crate::TableDef::decode_rows`] builds records, so a record is
/// always complete for the table that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub(crate) fn from_entries(entries: Vec<(String, Value)>) -> Self {
        Self { entries }
    }

    /// Value of the named column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Replace the value of an existing column. Returns the previous value.
    ///
    /// Used by edit flows; the column set of a record never changes.
    pub fn set(&mut self, column: &str, value: Value) -> Option<Value> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, slot)| std::mem::replace(slot, value))
    }

    /// `(column, value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
