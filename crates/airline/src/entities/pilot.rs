//! Pilots, each with an optional home airport.

use airline_db::DbConnection;
use airline_schema::{confirm, ColumnDef, Console, DataType, Record, SchemaError, TableDef, Value};
use tracing::info;

use super::{edit_and_save, insert, list_records, record_id, typed_edit, AirportTable, ID_COLUMN};
use crate::error::Result;

const HOME_AIRPORT_COLUMN: &str = "home_airport_id";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS pilot (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    home_airport_id INTEGER,
    FOREIGN KEY (home_airport_id) REFERENCES airport(id)
);
"#;

const INSERT: &str = "INSERT INTO pilot (name, age, home_airport_id) VALUES (?, ?, ?)";

#[derive(Debug, Clone)]
pub struct PilotTable {
    table: TableDef,
}

impl PilotTable {
    pub fn new() -> std::result::Result<Self, SchemaError> {
        let table = TableDef::new(
            "pilot",
            vec![
                ColumnDef::required(ID_COLUMN, DataType::Int),
                ColumnDef::required("name", DataType::Text),
                ColumnDef::required("age", DataType::Int),
                ColumnDef::optional(HOME_AIRPORT_COLUMN, DataType::Int),
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

    /// Collect name and age, then optionally pick a home airport.
    /// Declining or aborting the pick stores NULL.
    pub fn create_record(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        airports: &AirportTable,
    ) -> Result<i64> {
        let mut values = self.table.collect_values(console, |column| {
            column.name != ID_COLUMN && column.name != HOME_AIRPORT_COLUMN
        })?;

        let home = if confirm(console, "Would you like to set a home airport for this pilot?")? {
            airports.pick_id(conn, console, "Please select the pilot's home airport")?
        } else {
            None
        };
        values.push(Value::Int(home));

        let id = insert(conn, INSERT, &values)?;
        info!(id, home_airport_id = ?home, "Pilot created");
        console.print("New pilot created successfully")?;
        Ok(id)
    }

    /// The home airport is changed by picking an airport; aborting keeps it.
    pub fn update_record(
        &self,
        conn: &DbConnection,
        console: &mut dyn Console,
        airports: &AirportTable,
    ) -> Result<Option<i64>> {
        console.print("Select a pilot to update: ")?;
        let Some(record) = self.table.pick_record(conn, console, &[])? else {
            return Ok(None);
        };
        edit_and_save(&self.table, conn, console, record, |column, console| {
            if column.name == HOME_AIRPORT_COLUMN {
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

#[cfg(test)]
mod tests {
    use super::*;
    use airline_schema::ScriptedConsole;

    fn setup() -> (DbConnection, AirportTable, PilotTable) {
        let conn = DbConnection::open_memory().unwrap();
        AirportTable::create_table(&conn).unwrap();
        PilotTable::create_table(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO airport (icao_code, name, city) VALUES ('EGLL', 'Heathrow', 'London');
             INSERT INTO airport (icao_code, name, city) VALUES ('LFPG', 'Charles de Gaulle', 'Paris');",
        )
        .unwrap();
        (conn, AirportTable::new().unwrap(), PilotTable::new().unwrap())
    }

    fn home_airport(conn: &DbConnection, pilot_id: i64) -> Option<i64> {
        conn.query_scalar(
            "SELECT home_airport_id FROM pilot WHERE id = ?",
            &[pilot_id.into()],
        )
        .unwrap()
    }

    #[test]
    fn test_create_without_home_airport_stores_null() {
        let (conn, airports, pilots) = setup();
        let mut console = ScriptedConsole::new(["Amelia", "39", "n"]);

        let id = pilots.create_record(&conn, &mut console, &airports).unwrap();
        assert_eq!(home_airport(&conn, id), None);
    }

    #[test]
    fn test_create_with_home_airport() {
        let (conn, airports, pilots) = setup();
        // name, age rejected then accepted, set home: no filters, second airport
        let mut console = ScriptedConsole::new(["Amelia", "thirty", "39", "y", "n", "2"]);

        let id = pilots.create_record(&conn, &mut console, &airports).unwrap();
        assert_eq!(home_airport(&conn, id), Some(2));
        assert!(console.printed("Please enter a valid Int value"));
    }

    #[test]
    fn test_create_with_aborted_pick_stores_null() {
        let (conn, airports, pilots) = setup();
        let mut console = ScriptedConsole::new(["Amelia", "39", "y", "n", "0"]);

        let id = pilots.create_record(&conn, &mut console, &airports).unwrap();
        assert_eq!(home_airport(&conn, id), None);
    }

    #[test]
    fn test_update_home_airport_by_picking() {
        let (conn, airports, pilots) = setup();
        let mut console = ScriptedConsole::new(["Amelia", "39", "y", "n", "1"]);
        pilots.create_record(&conn, &mut console, &airports).unwrap();

        let mut console = ScriptedConsole::new([
            "n", "1", // pick the pilot
            "n", "n", // keep name and age
            "y", "n", "2", // move home airport
            "y", // proceed
        ]);
        let updated = pilots.update_record(&conn, &mut console, &airports).unwrap();

        assert_eq!(updated, Some(1));
        assert_eq!(home_airport(&conn, 1), Some(2));
    }
}
