//! File-backed database tests. Uses REAL SQLite files in a temp dir.

use airline_db::{DbConnection, DbError, DbValue};
use tempfile::TempDir;

#[test]
fn test_open_creates_database_and_parent_dirs() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("nested").join("airline.db");

    let db = DbConnection::open(&db_path).unwrap();
    assert!(db_path.exists());
    assert!(db.foreign_keys_enabled().unwrap());
}

#[test]
fn test_open_existing_fails_if_not_exists() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("nonexistent.db");

    let result = DbConnection::open_existing(&db_path);
    assert!(matches!(result, Err(DbError::NotFound(_))));
}

#[test]
fn test_writes_are_visible_to_a_new_connection() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("airline.db");

    {
        let db = DbConnection::open(&db_path).unwrap();
        db.execute_batch("CREATE TABLE airport (id INTEGER PRIMARY KEY, icao_code TEXT)")
            .unwrap();
        db.execute(
            "INSERT INTO airport (icao_code) VALUES (?)",
            &[DbValue::from("KJFK")],
        )
        .unwrap();
        assert_eq!(db.last_insert_rowid(), 1);
    }

    let db = DbConnection::open_existing(&db_path).unwrap();
    let count: i64 = db.query_scalar("SELECT COUNT(*) FROM airport", &[]).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_foreign_key_violation_is_constraint() {
    let db = DbConnection::open_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE airport (id INTEGER PRIMARY KEY);
         CREATE TABLE flight (
             id INTEGER PRIMARY KEY,
             origin_id INTEGER NOT NULL,
             FOREIGN KEY (origin_id) REFERENCES airport(id)
         );",
    )
    .unwrap();

    let err = db
        .execute("INSERT INTO flight (origin_id) VALUES (?)", &[DbValue::from(99_i64)])
        .unwrap_err();
    assert!(err.is_constraint(), "unexpected error: {err}");
}
