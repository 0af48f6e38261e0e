//! Derived reports over the entity tables.
//!
//! Each report declares the shape of its result as a [`TableDef`] and runs a
//! fixed, parameterized statement through [`TableDef::query`]. Reports that
//! need a subject (a flight, a pilot) let the user pick it first and return
//! `None` when the pick is aborted.

use airline_db::{DbConnection, DbValue};
use airline_schema::{ColumnDef, Console, DataType, Record, TableDef};
use tracing::info;

use crate::entities::{FlightTable, PilotTable};
use crate::error::Result;

/// Pilots with no flight assignment, with their home airport's ICAO code.
const UNASSIGNED_PILOTS: &str = r#"
SELECT
    p.id AS pilot_id,
    p.name AS name,
    a.icao_code AS home_airport
FROM pilot p
LEFT JOIN flight_pilot fp ON p.id = fp.pilot_id
LEFT JOIN airport a ON p.home_airport_id = a.id
WHERE fp.flight_id IS NULL
ORDER BY p.id
"#;

/// One row per pilot assigned to the flight; a single row with NULL pilot
/// columns when nobody is assigned.
const FLIGHT_PILOT_ASSIGNMENTS: &str = r#"
SELECT
    p.id AS pilot_id,
    p.name AS pilot_name,
    f.flight_number,
    f.date,
    f.status,
    origin.icao_code AS origin,
    destination.icao_code AS destination
FROM flight f
LEFT JOIN flight_pilot fp ON f.id = fp.flight_id
LEFT JOIN pilot p ON fp.pilot_id = p.id
LEFT JOIN airport origin ON f.origin_id = origin.id
LEFT JOIN airport destination ON f.destination_id = destination.id
WHERE f.id = ?
ORDER BY p.id
"#;

/// Flights assigned to one pilot, soonest departure first.
const PILOT_SCHEDULE: &str = r#"
SELECT
    f.flight_number,
    f.status,
    f.departure_time,
    f.arrival_time,
    origin.icao_code AS origin,
    destination.icao_code AS destination
FROM flight AS f
JOIN flight_pilot AS fp ON f.id = fp.flight_id
JOIN pilot AS p ON fp.pilot_id = p.id
JOIN airport AS origin ON f.origin_id = origin.id
JOIN airport AS destination ON f.destination_id = destination.id
WHERE p.id = ?
ORDER BY f.departure_time
"#;

/// How often each pilot flies to each destination, most frequent first.
const PILOT_DESTINATION_FREQUENCIES: &str = r#"
SELECT
    p.name AS pilot,
    a.icao_code AS destination,
    COUNT(*) AS visits
FROM flight_pilot fp
JOIN flight f ON fp.flight_id = f.id
JOIN pilot p ON fp.pilot_id = p.id
JOIN airport a ON f.destination_id = a.id
GROUP BY p.id, a.id
ORDER BY visits DESC, p.name, a.icao_code
"#;

fn run_report(
    table: &TableDef,
    conn: &DbConnection,
    console: &mut dyn Console,
    statement: &str,
    params: &[DbValue],
) -> Result<Vec<Record>> {
    let records = table.query(conn, statement, params)?;
    info!(report = %table.name(), rows = records.len(), "Report generated");
    table.display_records(console, &records)?;
    Ok(records)
}

pub fn unassigned_pilots(conn: &DbConnection, console: &mut dyn Console) -> Result<Vec<Record>> {
    let table = TableDef::new(
        "unassigned_pilots",
        vec![
            ColumnDef::required("pilot_id", DataType::Int),
            ColumnDef::required("name", DataType::Text),
            ColumnDef::optional("home_airport", DataType::Text),
        ],
    )?;
    run_report(&table, conn, console, UNASSIGNED_PILOTS, &[])
}

pub fn flight_pilot_assignments(
    conn: &DbConnection,
    console: &mut dyn Console,
    flights: &FlightTable,
) -> Result<Option<Vec<Record>>> {
    let Some(flight) = flights.pick(conn, console, "Please select a flight: ")? else {
        return Ok(None);
    };
    let flight_id = flights.id_of(&flight)?;

    let table = TableDef::new(
        "flight_pilot_assignments",
        vec![
            ColumnDef::optional("pilot_id", DataType::Int),
            ColumnDef::optional("pilot_name", DataType::Text),
            ColumnDef::required("flight_number", DataType::Text),
            ColumnDef::required("date", DataType::Date),
            ColumnDef::required("status", DataType::Text),
            ColumnDef::required("origin", DataType::Text),
            ColumnDef::required("destination", DataType::Text),
        ],
    )?;
    run_report(
        &table,
        conn,
        console,
        FLIGHT_PILOT_ASSIGNMENTS,
        &[DbValue::from(flight_id)],
    )
    .map(Some)
}

pub fn pilot_schedule(
    conn: &DbConnection,
    console: &mut dyn Console,
    pilots: &PilotTable,
) -> Result<Option<Vec<Record>>> {
    let Some(pilot) = pilots.pick(conn, console, "Please select a pilot: ")? else {
        return Ok(None);
    };
    let pilot_id = pilots.id_of(&pilot)?;

    let table = TableDef::new(
        "pilot_schedule",
        vec![
            ColumnDef::required("flight_number", DataType::Text),
            ColumnDef::required("status", DataType::Text),
            ColumnDef::required("departure_time", DataType::DateTime),
            ColumnDef::required("arrival_time", DataType::DateTime),
            ColumnDef::required("origin", DataType::Text),
            ColumnDef::required("destination", DataType::Text),
        ],
    )?;
    run_report(&table, conn, console, PILOT_SCHEDULE, &[DbValue::from(pilot_id)]).map(Some)
}

pub fn pilot_destination_frequencies(
    conn: &DbConnection,
    console: &mut dyn Console,
) -> Result<Vec<Record>> {
    let table = TableDef::new(
        "pilot_destination_frequencies",
        vec![
            ColumnDef::required("pilot", DataType::Text),
            ColumnDef::required("destination", DataType::Text),
            ColumnDef::required("visits", DataType::Int),
        ],
    )?;
    run_report(&table, conn, console, PILOT_DESTINATION_FREQUENCIES, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{create_all_tables, Entities};
    use airline_schema::{ScriptedConsole, Value};

    /// Airports 1..=3, pilots Amelia (home EGLL), Bessie (no home), Chuck;
    /// Amelia flies flights 1 and 3, Chuck flies flight 2, flight 4 is unstaffed.
    fn seeded() -> (DbConnection, Entities) {
        let conn = DbConnection::open_memory().unwrap();
        create_all_tables(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO airport (icao_code, name, city) VALUES
                ('EGLL', 'Heathrow', 'London'),
                ('KJFK', 'Kennedy', 'New York'),
                ('LFPG', 'Charles de Gaulle', 'Paris');
             INSERT INTO pilot (name, age, home_airport_id) VALUES
                ('Amelia', 39, 1), ('Bessie', 44, NULL), ('Chuck', 51, 2);
             INSERT INTO flight (flight_number, date, status, departure_time, arrival_time,
                                 origin_id, destination_id) VALUES
                ('BA117', '2024-03-02 00:00:00', 'scheduled', '2024-03-02 09:00:00', '2024-03-02 17:00:00', 1, 2),
                ('AF006', '2024-03-01 00:00:00', 'boarding', '2024-03-01 10:00:00', '2024-03-01 18:00:00', 3, 2),
                ('BA118', '2024-03-01 00:00:00', 'arrived', '2024-03-01 06:00:00', '2024-03-01 14:00:00', 1, 2),
                ('BA304', '2024-03-03 00:00:00', 'delayed', '2024-03-03 08:00:00', '2024-03-03 09:15:00', 1, 3);
             INSERT INTO flight_pilot (flight_id, pilot_id) VALUES (1, 1), (3, 1), (2, 3);",
        )
        .unwrap();
        (conn, Entities::new().unwrap())
    }

    fn column(records: &[Record], name: &str) -> Vec<String> {
        records
            .iter()
            .map(|record| record.get(name).map(Value::to_str).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_unassigned_pilots_includes_null_home_airport() {
        let (conn, _) = seeded();
        let mut console = ScriptedConsole::new(Vec::<String>::new());

        let records = unassigned_pilots(&conn, &mut console).unwrap();

        assert_eq!(column(&records, "name"), vec!["Bessie"]);
        assert_eq!(records[0].get("home_airport"), Some(&Value::Text(None)));
        assert!(console.printed("Your query yielded 1 records"));
    }

    #[test]
    fn test_flight_pilot_assignments_for_unstaffed_flight() {
        let (conn, entities) = seeded();
        // no filters, fourth flight
        let mut console = ScriptedConsole::new(["n", "4"]);

        let records = flight_pilot_assignments(&conn, &mut console, &entities.flights)
            .unwrap()
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("pilot_id"), Some(&Value::Int(None)));
        assert_eq!(column(&records, "destination"), vec!["LFPG"]);
    }

    #[test]
    fn test_flight_pilot_assignments_abort() {
        let (conn, entities) = seeded();
        let mut console = ScriptedConsole::new(["n", "0"]);
        let result = flight_pilot_assignments(&conn, &mut console, &entities.flights).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_pilot_schedule_ordered_by_departure() {
        let (conn, entities) = seeded();
        let mut console = ScriptedConsole::new(["n", "1"]);

        let records = pilot_schedule(&conn, &mut console, &entities.pilots)
            .unwrap()
            .unwrap();

        assert_eq!(column(&records, "flight_number"), vec!["BA118", "BA117"]);
        assert_eq!(column(&records, "origin"), vec!["EGLL", "EGLL"]);
        assert_eq!(
            column(&records, "departure_time"),
            vec!["2024-03-01 06:00:00", "2024-03-02 09:00:00"]
        );
    }

    #[test]
    fn test_pilot_destination_frequencies_most_visits_first() {
        let (conn, _) = seeded();
        let mut console = ScriptedConsole::new(Vec::<String>::new());

        let records = pilot_destination_frequencies(&conn, &mut console).unwrap();

        assert_eq!(column(&records, "pilot"), vec!["Amelia", "Chuck"]);
        assert_eq!(column(&records, "destination"), vec!["KJFK", "KJFK"]);
        assert_eq!(column(&records, "visits"), vec!["2", "1"]);
    }
}
