//! Pilot-to-flight assignments (junction table).

use airline_db::{DbConnection, DbValue};
use airline_schema::{ColumnDef, Console, DataType, SchemaError, TableDef, Value};
use tracing::info;

use super::{list_records, FlightTable, PilotTable};
use crate::error::Result;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS flight_pilot (
    flight_id INTEGER NOT NULL,
    pilot_id INTEGER NOT NULL,
    PRIMARY KEY (flight_id, pilot_id),
    FOREIGN KEY (flight_id) REFERENCES flight(id),
    FOREIGN KEY (pilot_id) REFERENCES pilot(id)
);
"#;

const INSERT: &str = "INSERT INTO flight_pilot (flight_id, pilot_id) VALUES (?, ?)";

#[derive(Debug, Clone)]
pub struct FlightPilotTable {
    table: TableDef,
}

impl FlightPilotTable {
    pub fn new() -> std::result::Result<Self, SchemaError> {
        let table = TableDef::new(
            "flight_pilot",
            vec![
                ColumnDef::required("flight_id", DataType::Int),
                ColumnDef::required("pilot_id", DataType::Int),
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

    /// Insert one assignment. Assigning the same pair twice, or a missing
    /// flight or pilot, is a constraint violation.
    pub fn create_record(&self, conn: &DbConnection, flight_id: i64, pilot_id: i64) -> Result<()> {
        conn.execute(INSERT, &[DbValue::from(flight_id), DbValue::from(pilot_id)])?;
        info!(flight_id, pilot_id, "Pilot assigned");
        Ok(())
    }

    /// Pick a pilot, then a flight, and assign them. Returns `false` when
    /// either pick was aborted.
    pub fn assign(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        pilots: &PilotTable,
        flights: &FlightTable,
    ) -> Result<bool> {
        let Some(pilot) = pilots.pick(conn, console, "Please select a pilot to assign")? else {
            return Ok(false);
        };
        let pilot_name = pilot.get("name").map(Value::to_str).unwrap_or_default();

        let purpose = format!("Please select a flight for {}", pilot_name);
        let Some(flight) = flights.pick(conn, console, &purpose)? else {
            return Ok(false);
        };
        let flight_number = flight
            .get("flight_number")
            .map(Value::to_str)
            .unwrap_or_default();

        self.create_record(conn, flights.id_of(&flight)?, pilots.id_of(&pilot)?)?;
        console.print(&format!(
            "{} assigned to flight {}",
            pilot_name, flight_number
        ))?;
        Ok(true)
    }

    pub fn list_records(&self, conn: &DbConnection, console: &mut dyn Console) -> Result<usize> {
        list_records(&self.table, conn, console)
    }
}
