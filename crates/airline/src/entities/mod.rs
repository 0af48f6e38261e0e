//! Entity tables: declarations, DDL and the create/update/list flows.
//!
//! Each entity owns its [`TableDef`] plus the SQL text for its table. The
//! update flow is shared: pick a record, offer every non-key column for
//! editing, show the result, confirm, then write all editable columns back.

pub mod airport;
pub mod flight;
pub mod flight_pilot;
pub mod pilot;

use std::io;

use airline_db::{DbConnection, DbValue};
use airline_schema::{confirm, ColumnDef, Console, Record, SchemaError, TableDef, Value};
use tracing::info;

use crate::error::{AppError, Result};

pub use airport::AirportTable;
pub use flight::FlightTable;
pub use flight_pilot::FlightPilotTable;
pub use pilot::PilotTable;

/// Surrogate key column of every entity except the junction table.
pub const ID_COLUMN: &str = "id";

/// Every entity table, declared once per session.
#[derive(Debug, Clone)]
pub struct Entities {
    pub airports: AirportTable,
    pub pilots: PilotTable,
    pub flights: FlightTable,
    pub assignments: FlightPilotTable,
}

impl Entities {
    pub fn new() -> std::result::Result<Self, SchemaError> {
        Ok(Self {
            airports: AirportTable::new()?,
            pilots: PilotTable::new()?,
            flights: FlightTable::new()?,
            assignments: FlightPilotTable::new()?,
        })
    }
}

/// Create every table that does not exist yet, referenced tables first.
pub fn create_all_tables(conn: &DbConnection) -> airline_db::Result<()> {
    AirportTable::create_table(conn)?;
    PilotTable::create_table(conn)?;
    FlightTable::create_table(conn)?;
    FlightPilotTable::create_table(conn)?;
    info!(database = %conn.location(), "Schema ready");
    Ok(())
}

/// The `id` of a decoded record.
pub(crate) fn record_id(table: &TableDef, record: &Record) -> Result<i64> {
    record
        .get(ID_COLUMN)
        .and_then(Value::as_int)
        .ok_or_else(|| AppError::missing_key(table.name(), ID_COLUMN))
}

/// Run an INSERT and return the new row's id.
pub(crate) fn insert(conn: &DbConnection, statement: &str, values: &[Value]) -> Result<i64> {
    let params: Vec<DbValue> = values.iter().map(Value::to_db_value).collect();
    conn.execute(statement, &params)?;
    Ok(conn.last_insert_rowid())
}

/// `    key: value` for every column, `NULL` for nulls.
pub(crate) fn print_record(console: &mut dyn Console, record: &Record) -> io::Result<()> {
    for (column, value) in record.iter() {
        console.print(&format!("    {}: {}", column, value.to_str()))?;
    }
    Ok(())
}

/// `UPDATE <table> SET a = ?, b = ? WHERE id = ?`
pub(crate) fn update_statement(table: &TableDef, columns: &[&ColumnDef]) -> String {
    let assignments = columns
        .iter()
        .map(|column| format!("{} = ?", column.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table.name(),
        assignments,
        ID_COLUMN
    )
}

/// Prompt for a replacement value of `column` by typed input.
pub(crate) fn typed_edit(
    table: &TableDef,
    column: &ColumnDef,
    console: &mut dyn Console,
) -> Result<Option<Value>> {
    let prompt = format!("Please enter the new value for {}: ", column.name);
    Ok(Some(table.collect_value(console, column, Some(prompt.as_str()))?))
}

/// Edit a picked record column by column and write it back after confirmation.
///
/// `edit` returns the replacement for one column, or `None` to keep the
/// current value. Returns the record id when the update was written.
pub(crate) fn edit_and_save(
    table: &TableDef,
    conn: &DbConnection,
    console: &mut dyn Console,
    mut record: Record,
    mut edit: impl FnMut(&ColumnDef, &mut dyn Console) -> Result<Option<Value>>,
) -> Result<Option<i64>> {
    let id = record_id(table, &record)?;
    let editable: Vec<&ColumnDef> = table
        .columns()
        .iter()
        .filter(|column| column.name != ID_COLUMN)
        .collect();

    for column in &editable {
        if confirm(console, &format!("Would you like to update {}?", column.name))? {
            if let Some(value) = edit(*column, &mut *console)? {
                record.set(&column.name, value);
            }
        }
    }

    console.clear()?;
    console.print(&format!(
        "The {} will be updated to reflect the following values:",
        table.name()
    ))?;
    print_record(console, &record)?;

    if !confirm(console, "Would you like to proceed with these changes?")? {
        info!(table = %table.name(), id, "Update discarded");
        return Ok(None);
    }

    let mut params: Vec<DbValue> = editable
        .iter()
        .map(|column| {
            record
                .get(&column.name)
                .map(Value::to_db_value)
                .unwrap_or(DbValue::Null)
        })
        .collect();
    params.push(DbValue::Integer(id));

    conn.execute(&update_statement(table, &editable), &params)?;
    info!(table = %table.name(), id, "Record updated");
    console.print(&format!("Existing {} updated successfully", table.name()))?;
    Ok(Some(id))
}

/// List records matching the user's filters. Returns how many were shown.
pub(crate) fn list_records(
    table: &TableDef,
    conn: &DbConnection,
    console: &mut dyn Console,
) -> Result<usize> {
    let records = table.query_with_conditions(conn, console, &[])?;
    table.display_records(console, &records)?;
    Ok(records.len())
}
