//! SQLite connection wrapper.
//!
//! Synchronous, single-threaded access:
//! - one shared connection per process (`Rc`, not `Send`)
//! - autocommit, so every statement is durable when it returns
//! - foreign keys enforced on every connection opened here

use std::borrow::Cow;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use rusqlite::types::ValueRef;
use tracing::{debug_span, info};

use crate::error::{DbError, Result};

/// Value type for query parameters and result cells.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl DbValue {
    /// Textual form of the cell, `None` for NULL.
    ///
    /// This is the shape raw cells take before typed validation.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            DbValue::Null => None,
            DbValue::Integer(v) => Some(Cow::Owned(v.to_string())),
            DbValue::Real(v) => Some(Cow::Owned(v.to_string())),
            DbValue::Text(v) => Some(Cow::Borrowed(v.as_str())),
            DbValue::Blob(v) => Some(String::from_utf8_lossy(v)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DbValue::Null)
    }
}

impl From<i64> for DbValue {
    fn from(v: i64) -> Self {
        DbValue::Integer(v)
    }
}

impl From<String> for DbValue {
    fn from(v: String) -> Self {
        DbValue::Text(v)
    }
}

impl From<&str> for DbValue {
    fn from(v: &str) -> Self {
        DbValue::Text(v.to_string())
    }
}

impl<T: Into<DbValue>> From<Option<T>> for DbValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => DbValue::Null,
        }
    }
}

impl rusqlite::ToSql for DbValue {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::ToSqlOutput;

        Ok(match self {
            DbValue::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            DbValue::Integer(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            DbValue::Real(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            DbValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            DbValue::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
        })
    }
}

/// Row data from a query result.
///
/// Rows keep the result's column names so cells are addressable by name.
#[derive(Debug, Clone)]
pub struct DbRow {
    columns: Rc<[String]>,
    values: Vec<DbValue>,
}

impl DbRow {
    /// Create a new row with column names and values.
    pub fn new(columns: impl Into<Rc<[String]>>, values: Vec<DbValue>) -> Self {
        Self {
            columns: columns.into(),
            values,
        }
    }

    /// Get a value by column index.
    pub fn get<T: FromDbValue>(&self, index: usize) -> Result<T> {
        self.values
            .get(index)
            .ok_or_else(|| DbError::TypeConversion(format!("Column index {} out of bounds", index)))
            .and_then(T::from_db_value)
    }

    /// Get a value by column name.
    pub fn get_by_name<T: FromDbValue>(&self, name: &str) -> Result<T> {
        let index = self
            .position(name)
            .ok_or_else(|| DbError::TypeConversion(format!("Column '{}' not found", name)))?;
        self.get(index)
    }

    /// Index of the named column in this row's result schema.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the column names.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Get the raw DbValue at an index.
    pub fn get_raw(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }
}

/// Trait for converting from DbValue.
pub trait FromDbValue: Sized {
    fn from_db_value(value: &DbValue) -> Result<Self>;
}

impl FromDbValue for i64 {
    fn from_db_value(value: &DbValue) -> Result<Self> {
        match value {
            DbValue::Integer(v) => Ok(*v),
            DbValue::Null => Err(DbError::TypeConversion(
                "i64 field is NULL - use Option<i64> for nullable columns".to_string(),
            )),
            _ => Err(DbError::TypeConversion("Expected integer".to_string())),
        }
    }
}

impl FromDbValue for String {
    fn from_db_value(value: &DbValue) -> Result<Self> {
        match value {
            DbValue::Text(v) => Ok(v.clone()),
            DbValue::Null => Err(DbError::TypeConversion(
                "String field is NULL - use Option<String> for nullable columns".to_string(),
            )),
            _ => Err(DbError::TypeConversion("Expected text".to_string())),
        }
    }
}

impl<T: FromDbValue> FromDbValue for Option<T> {
    fn from_db_value(value: &DbValue) -> Result<Self> {
        match value {
            DbValue::Null => Ok(None),
            _ => T::from_db_value(value).map(Some),
        }
    }
}

/// Shared SQLite connection.
#[derive(Clone)]
pub struct DbConnection {
    conn: Rc<rusqlite::Connection>,
    location: Rc<str>,
}

impl std::fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConnection")
            .field("backend", &"SQLite")
            .field("location", &self.location)
            .finish()
    }
}

impl DbConnection {
    /// Open or create a database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = rusqlite::Connection::open(path)?;
        let db = Self::configure(conn, &path.display().to_string())?;
        info!(path = %path.display(), "Opened SQLite database");
        Ok(db)
    }

    /// Open an existing database (fails if not exists).
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DbError::not_found(format!(
                "Database not found: {}",
                path.display()
            )));
        }
        Self::open(path)
    }

    /// Open an in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        let db = Self::configure(conn, ":memory:")?;
        info!("Opened in-memory SQLite database");
        Ok(db)
    }

    fn configure(conn: rusqlite::Connection, location: &str) -> Result<Self> {
        // SQLite ships with foreign keys off; referential integrity is the storage's job here.
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        Ok(Self {
            conn: Rc::new(conn),
            location: Rc::from(location),
        })
    }

    /// Where this connection points (file path or `:memory:`).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether `PRAGMA foreign_keys` is currently on.
    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        let enabled: i64 = self.query_scalar("PRAGMA foreign_keys", &[])?;
        Ok(enabled == 1)
    }

    /// Execute a SQL statement (no results). Returns affected rows.
    pub fn execute(&self, sql: &str, params: &[DbValue]) -> Result<u64> {
        let op = sql_op_name(sql);
        let sql_hash = hash_sql(sql);
        let span = debug_span!(
            "db.exec",
            op = op,
            sql_hash = %sql_hash,
            duration_ms = tracing::field::Empty
        );
        let _guard = span.enter();
        let start = Instant::now();

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.execute(rusqlite::params_from_iter(params.iter()))?;

        span.record("duration_ms", start.elapsed().as_millis() as u64);
        Ok(rows as u64)
    }

    /// Execute a batch of SQL statements.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let sql_hash = hash_sql(sql);
        let span = debug_span!(
            "db.exec_batch",
            op = "BATCH",
            sql_hash = %sql_hash,
            duration_ms = tracing::field::Empty
        );
        let _guard = span.enter();
        let start = Instant::now();

        self.conn.execute_batch(sql)?;

        span.record("duration_ms", start.elapsed().as_millis() as u64);
        Ok(())
    }

    /// Query and return all rows.
    pub fn query_all(&self, sql: &str, params: &[DbValue]) -> Result<Vec<DbRow>> {
        let op = sql_op_name(sql);
        let sql_hash = hash_sql(sql);
        let span = debug_span!(
            "db.query",
            op = op,
            sql_hash = %sql_hash,
            rows = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        );
        let _guard = span.enter();
        let start = Instant::now();

        let mut stmt = self.conn.prepare(sql)?;
        let columns: Rc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into();
        let column_count = columns.len();

        let mut rows_iter = stmt.query(rusqlite::params_from_iter(params.iter()))?;
        let mut result = Vec::new();

        while let Some(row) = rows_iter.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(Self::cell_to_db_value(row.get_ref(i)?));
            }
            result.push(DbRow::new(Rc::clone(&columns), values));
        }

        span.record("rows", result.len() as u64);
        span.record("duration_ms", start.elapsed().as_millis() as u64);
        Ok(result)
    }

    /// Query and return the first row, if any.
    pub fn query_optional(&self, sql: &str, params: &[DbValue]) -> Result<Option<DbRow>> {
        let rows = self.query_all(sql, params)?;
        Ok(rows.into_iter().next())
    }

    /// Query and return exactly one row.
    pub fn query_one(&self, sql: &str, params: &[DbValue]) -> Result<DbRow> {
        self.query_optional(sql, params)?
            .ok_or_else(|| DbError::Query("Expected one row, got none".to_string()))
    }

    /// Query and return a single scalar value.
    pub fn query_scalar<T: FromDbValue>(&self, sql: &str, params: &[DbValue]) -> Result<T> {
        let row = self.query_one(sql, params)?;
        row.get(0)
    }

    /// Rowid of the most recent successful INSERT on this connection.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    fn cell_to_db_value(cell: ValueRef<'_>) -> DbValue {
        match cell {
            ValueRef::Null => DbValue::Null,
            ValueRef::Integer(v) => DbValue::Integer(v),
            ValueRef::Real(v) => DbValue::Real(v),
            ValueRef::Text(v) => DbValue::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => DbValue::Blob(v.to_vec()),
        }
    }
}

fn sql_op_name(sql: &str) -> &str {
    sql.split_whitespace().next().unwrap_or("unknown")
}

fn hash_sql(sql: &str) -> String {
    // FNV-1a 64-bit hash for low-cardinality, stable identification.
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in sql.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    format!("{:016x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_with_table() -> DbConnection {
        let conn = DbConnection::open_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)")
            .unwrap();
        conn
    }

    #[test]
    fn test_query_rows_are_addressable_by_name() {
        let conn = memory_with_table();
        conn.execute("INSERT INTO t (name) VALUES (?)", &[DbValue::from("alpha")])
            .unwrap();

        let rows = conn.query_all("SELECT id, name FROM t", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column_names(), &["id".to_string(), "name".to_string()]);
        let name: String = rows[0].get_by_name("name").unwrap();
        assert_eq!(name, "alpha");
        assert_eq!(rows[0].position("missing"), None);
    }

    #[test]
    fn test_parameters_are_bound_not_interpolated() {
        let conn = memory_with_table();
        let hostile = "x'); DROP TABLE t; --";
        conn.execute("INSERT INTO t (name) VALUES (?)", &[DbValue::from(hostile)])
            .unwrap();

        let stored: String = conn
            .query_scalar("SELECT name FROM t WHERE name = ?", &[DbValue::from(hostile)])
            .unwrap();
        assert_eq!(stored, hostile);
    }

    #[test]
    fn test_unique_violation_maps_to_constraint() {
        let conn = memory_with_table();
        conn.execute("INSERT INTO t (name) VALUES (?)", &[DbValue::from("dup")])
            .unwrap();
        let err = conn
            .execute("INSERT INTO t (name) VALUES (?)", &[DbValue::from("dup")])
            .unwrap_err();
        assert!(err.is_constraint(), "unexpected error: {err}");
    }

    #[test]
    fn test_foreign_keys_enabled_on_open() {
        let conn = DbConnection::open_memory().unwrap();
        assert!(conn.foreign_keys_enabled().unwrap());
    }

    #[test]
    fn test_as_text_renders_cells() {
        assert_eq!(DbValue::Integer(42).as_text().as_deref(), Some("42"));
        assert_eq!(DbValue::from("abc").as_text().as_deref(), Some("abc"));
        assert_eq!(DbValue::Null.as_text(), None);
        assert!(DbValue::from(None::<i64>).is_null());
    }

    #[test]
    fn test_query_one_on_empty_result() {
        let conn = memory_with_table();
        let err = conn.query_one("SELECT id FROM t", &[]).unwrap_err();
        assert!(matches!(err, DbError::Query(_)));
    }
}
