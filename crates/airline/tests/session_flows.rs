//! End-to-end tests for the interactive session.
//!
//! Each test drives the real menu loop with a scripted console against a
//! real SQLite database. Every action is followed by "" for the
//! "Press enter to return to the menu" prompt.

use airline::{create_all_tables, Session, SessionSummary};
use airline_db::DbConnection;
use airline_schema::ScriptedConsole;

fn fresh_db() -> DbConnection {
    let conn = DbConnection::open_memory().unwrap();
    create_all_tables(&conn).unwrap();
    conn
}

fn run(conn: &DbConnection, script: &[&str]) -> (airline::error::Result<SessionSummary>, ScriptedConsole) {
    let mut console = ScriptedConsole::new(script.iter().copied());
    let session = Session::new(conn).unwrap();
    let result = session.run(&mut console);
    (result, console)
}

fn count(conn: &DbConnection, table: &str) -> i64 {
    conn.query_scalar(&format!("SELECT COUNT(*) FROM {}", table), &[])
        .unwrap()
}

const CREATE_HEATHROW: [&str; 5] = ["1", "EGLL", "Heathrow", "London", ""];
const CREATE_KENNEDY: [&str; 5] = ["1", "KJFK", "Kennedy", "New York", ""];

// =============================================================================
// HAPPY PATH
// =============================================================================

#[test]
fn test_full_session_builds_schedule() {
    let conn = fresh_db();
    let mut script: Vec<&str> = Vec::new();
    script.extend(CREATE_HEATHROW);
    script.extend(CREATE_KENNEDY);
    // pilot with home airport EGLL
    script.extend(["4", "Amelia", "39", "y", "n", "1", ""]);
    // flight EGLL -> KJFK
    script.extend([
        "7",
        "BA117",
        "2024-03-01",
        "scheduled",
        "2024-03-01 09:00:00",
        "2024-03-01 17:00:00",
        "n",
        "1",
        "n",
        "2",
        "",
    ]);
    // assign Amelia to BA117
    script.extend(["10", "n", "1", "n", "1", ""]);
    // her schedule
    script.extend(["14", "n", "1", ""]);
    script.push("0");

    let (result, console) = run(&conn, &script);

    assert_eq!(
        result.unwrap(),
        SessionSummary {
            actions: 6,
            rejected: 0
        }
    );
    assert_eq!(console.remaining(), 0);
    assert!(console.printed("Amelia assigned to flight BA117"));
    assert!(console.printed("Your query yielded 1 records"));
    assert_eq!(count(&conn, "flight_pilot"), 1);
}

#[test]
fn test_list_flights_with_filter() {
    let conn = fresh_db();
    let mut script: Vec<&str> = Vec::new();
    script.extend(CREATE_HEATHROW);
    for number in ["BA117", "BA118"] {
        script.extend([
            "7",
            number,
            "2024-03-01",
            "delayed",
            "2024-03-01 09:00:00",
            "2024-03-01 17:00:00",
            "n",
            "1",
            "n",
            "1",
            "",
        ]);
    }
    // filter: flight_number (column 2) Like "%118"
    script.extend(["9", "y", "2", "2", "%118", "n", ""]);
    script.push("0");

    let (result, console) = run(&conn, &script);

    assert_eq!(result.unwrap().actions, 4);
    assert!(console.printed("Applied conditions: flight_number Like %118"));
    assert!(console.printed("Your query yielded 1 records"));
}

// =============================================================================
// REJECTED CHANGES KEEP THE SESSION ALIVE
// =============================================================================

#[test]
fn test_duplicate_assignment_is_reported_and_session_continues() {
    let conn = fresh_db();
    let mut script: Vec<&str> = Vec::new();
    script.extend(CREATE_HEATHROW);
    script.extend(["4", "Amelia", "39", "n", ""]);
    script.extend([
        "7",
        "BA117",
        "2024-03-01",
        "boarding",
        "2024-03-01 09:00:00",
        "2024-03-01 17:00:00",
        "n",
        "1",
        "n",
        "1",
        "",
    ]);
    script.extend(["10", "n", "1", "n", "1", ""]);
    script.extend(["10", "n", "1", "n", "1", ""]);
    // still usable afterwards
    script.extend(["12", ""]);
    script.push("0");

    let (result, console) = run(&conn, &script);

    assert_eq!(
        result.unwrap(),
        SessionSummary {
            actions: 5,
            rejected: 1
        }
    );
    assert!(console.printed("The change was rejected"));
    assert!(console.printed("UNIQUE constraint failed"));
    assert_eq!(count(&conn, "flight_pilot"), 1);
}

#[test]
fn test_duplicate_icao_code_is_reported() {
    let conn = fresh_db();
    let mut script: Vec<&str> = Vec::new();
    script.extend(CREATE_HEATHROW);
    script.extend(CREATE_HEATHROW);
    script.extend(["3", "n", ""]);
    script.push("0");

    let (result, console) = run(&conn, &script);

    let summary = result.unwrap();
    assert_eq!(summary.rejected, 1);
    assert!(console.printed("Your query yielded 1 records"));
    assert_eq!(count(&conn, "airport"), 1);
}

// =============================================================================
// ABORTS AND INVALID INPUT
// =============================================================================

#[test]
fn test_invalid_menu_choice_reprompts() {
    let conn = fresh_db();
    let (result, console) = run(&conn, &["99", "menu", "0"]);

    assert_eq!(result.unwrap(), SessionSummary::default());
    assert!(console.printed("Invalid input. Please enter a number between 0 and 15"));
}

#[test]
fn test_aborted_flight_create_writes_nothing() {
    let conn = fresh_db();
    let mut script: Vec<&str> = Vec::new();
    script.extend(CREATE_HEATHROW);
    script.extend([
        "7",
        "BA117",
        "2024-03-01",
        "scheduled",
        "2024-03-01 09:00:00",
        "2024-03-01 17:00:00",
        "n",
        "1",
        "n",
        "0", // abort destination
        "",
    ]);
    script.push("0");

    let (result, console) = run(&conn, &script);

    assert_eq!(result.unwrap().actions, 2);
    assert!(console.printed("Flight creation cancelled"));
    assert_eq!(count(&conn, "flight"), 0);
}

#[test]
fn test_closed_console_aborts_session() {
    let conn = fresh_db();
    let (result, _) = run(&conn, &["1", "EGLL"]);

    let err = result.unwrap_err();
    assert!(!err.is_constraint_violation());
    assert_eq!(count(&conn, "airport"), 0);
}

#[test]
fn test_update_with_empty_table_aborts_cleanly() {
    let conn = fresh_db();
    let (result, console) = run(&conn, &["2", "n", "0", "", "0"]);

    assert_eq!(result.unwrap().actions, 1);
    assert!(console.printed("Your query yielded 0 records"));
}

// =============================================================================
// PERSISTENCE
// =============================================================================

#[test]
fn test_session_changes_persist_in_database_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("data").join("airline.db");

    {
        let conn = DbConnection::open(&path).unwrap();
        create_all_tables(&conn).unwrap();
        let mut script: Vec<&str> = CREATE_HEATHROW.to_vec();
        script.push("0");
        let (result, _) = run(&conn, &script);
        result.unwrap();
    }

    let conn = DbConnection::open_existing(&path).unwrap();
    create_all_tables(&conn).unwrap();
    let city: String = conn
        .query_scalar("SELECT city FROM airport WHERE icao_code = 'EGLL'", &[])
        .unwrap();
    assert_eq!(city, "London");
}
