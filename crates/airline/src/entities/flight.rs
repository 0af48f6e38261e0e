//! Flights between two airports.

use airline_db::DbConnection;
use airline_schema::{ColumnDef, Console, DataType, Record, SchemaError, TableDef, Value};
use tracing::info;

use super::{edit_and_save, insert, list_records, record_id, typed_edit, AirportTable, ID_COLUMN};
use crate::error::Result;

pub const FLIGHT_STATUSES: [&str; 5] = ["scheduled", "delayed", "boarding", "departed", "arrived"];

const ORIGIN_COLUMN: &str = "origin_id";
const DESTINATION_COLUMN: &str = "destination_id";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS flight (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    flight_number TEXT NOT NULL,
    date DATE NOT NULL,
    status TEXT NOT NULL,
    departure_time DATETIME NOT NULL,
    arrival_time DATETIME NOT NULL,
    origin_id INTEGER NOT NULL,
    destination_id INTEGER NOT NULL,
    FOREIGN KEY (origin_id) REFERENCES airport(id),
    FOREIGN KEY (destination_id) REFERENCES airport(id),
    UNIQUE (flight_number, date)
);
"#;

const INSERT: &str = r#"
INSERT INTO flight
    (flight_number, date, status, departure_time, arrival_time, origin_id, destination_id)
VALUES
    (?, ?, ?, ?, ?, ?, ?)
"#;

fn is_airport_reference(column: &ColumnDef) -> bool {
    column.name == ORIGIN_COLUMN || column.name == DESTINATION_COLUMN
}

#[derive(Debug, Clone)]
pub struct FlightTable {
    table: TableDef,
}

impl FlightTable {
    pub fn new() -> std::result::Result<Self, SchemaError> {
        let table = TableDef::new(
            "flight",
            vec![
                ColumnDef::required(ID_COLUMN, DataType::Int),
                ColumnDef::required("flight_number", DataType::Text),
                ColumnDef::required("date", DataType::Date),
                ColumnDef::required("status", DataType::Text)
                    .with_allowed_values(FLIGHT_STATUSES.map(Value::new_text)),
                ColumnDef::required("departure_time", DataType::DateTime),
                ColumnDef::required("arrival_time", DataType::DateTime),
                ColumnDef::required(ORIGIN_COLUMN, DataType::Int),
                ColumnDef::required(DESTINATION_COLUMN, DataType::Int),
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

    /// Collect the scheduling columns, then pick origin and destination.
    /// Aborting either pick cancels the create and returns `None`.
    pub fn create_record(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        airports: &AirportTable,
    ) -> Result<Option<i64>> {
        let mut values = self.table.collect_values(console, |column| {
            column.name != ID_COLUMN && !is_airport_reference(column)
        })?;

        for (column, purpose) in [
            (ORIGIN_COLUMN, "Please take a moment to select the flight origin"),
            (DESTINATION_COLUMN, "Please take a moment to select the flight destination"),
        ] {
            match airports.pick_id(conn, console, purpose)? {
                Some(id) => values.push(Value::new_int(id)),
                None => {
                    info!(column, "Flight creation cancelled");
                    console.print("Flight creation cancelled")?;
                    return Ok(None);
                }
            }
        }

        let id = insert(conn, INSERT, &values)?;
        info!(id, flight_number = %values[0], "Flight created");
        console.print("New flight created successfully")?;
        Ok(Some(id))
    }

    /// Airport references are changed by picking an airport (aborting keeps
    /// the current one); every other column by typed input.
    pub fn update_record(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        airports: &AirportTable,
    ) -> Result<Option<i64>> {
        console.print("Select a flight to update: ")?;
        let Some(record) = self.table.pick_record(conn, console, &[])? else {
            return Ok(None);
        };
        edit_and_save(&self.table, conn, console, record, |column, console| {
            if is_airport_reference(column) {
                let purpose = format!("Please find an airport to set as the new {}", column.name);
                Ok(airports.pick_id(conn, console, &purpose)?.map(Value::new_int))
            } else {
                typed_edit(&self.table, column, console)
            }
        })
    }

    pub fn list_records(&self, conn: &DbConnection, console: &mut dyn Console) -> Result<usize> {
        list_records(&self.table, conn, console)
    }

    pub fn pick(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        purpose: &str,
    ) -> Result<Option<Record>> {
        console.print(purpose)?;
        Ok(self.table.pick_record(conn, console, &[])?)
    }

    pub fn id_of(&self, record: &Record) -> Result<i64> {
        record_id(&self.table, record)
    }
}
