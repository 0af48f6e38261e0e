//! Airports. Referenced by pilots (home airport) and flights (origin, destination).

use airline_db::DbConnection;
use airline_schema::{ColumnDef, Console, DataType, Record, SchemaError, TableDef};
use tracing::info;

use super::{edit_and_save, insert, list_records, record_id, typed_edit, ID_COLUMN};
use crate::error::Result;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS airport (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    icao_code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    city TEXT NOT NULL
);
"#;

const INSERT: &str = "INSERT INTO airport (icao_code, name, city) VALUES (?, ?, ?)";

#[derive(Debug, Clone)]
pub struct AirportTable {
    table: TableDef,
}

impl AirportTable {
    pub fn new() -> std::result::Result<Self, SchemaError> {
        let table = TableDef::new(
            "airport",
            vec![
                ColumnDef::required(ID_COLUMN, DataType::Int),
                ColumnDef::required("icao_code", DataType::Text),
                ColumnDef::required("name", DataType::Text),
                ColumnDef::required("city", DataType::Text),
            ],
        )?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &TableDef {
        &self.table
    }

    pub fn create_table(conn: &DbConnection) -> airline_db::Result<()> {
        conn.execute_batch(CREATE_TABLE)
    }

    /// Collect every column but `id` and insert. A duplicate ICAO code is a
    /// constraint violation.
    pub fn create_record(&self, conn: &DbConnection, console: &mut dyn Console) -> Result<i64> {
        let values = self
            .table
            .collect_values(console, |column| column.name != ID_COLUMN)?;
        let id = insert(conn, INSERT, &values)?;

        info!(id, icao_code = %values[0], "Airport created");
        console.print("New airport created successfully")?;
        Ok(id)
    }

    pub fn update_record(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
    ) -> Result<Option<i64>> {
        console.print("Select an airport to update: ")?;
        let Some(record) = self.table.pick_record(conn, console, &[])? else {
            return Ok(None);
        };
        edit_and_save(&self.table, conn, console, record, |column, console| {
            typed_edit(&self.table, column, console)
        })
    }

    pub fn list_records(&self, conn: &DbConnection, console: &mut dyn Console) -> Result<usize> {
        list_records(&self.table, conn, console)
    }

    /// Let the user pick an airport, after printing `purpose`.
    pub fn pick(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        purpose: &str,
    ) -> Result<Option<Record>> {
        console.print(purpose)?;
        Ok(self.table.pick_record(conn, console, &[])?)
    }

    /// Same as [`AirportTable::pick`], returning only the id.
    pub fn pick_id(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        purpose: &str,
    ) -> Result<Option<i64>> {
        self.pick(conn, console, purpose)?
            .map(|record| record_id(&self.table, &record))
            .transpose()
    }
}
