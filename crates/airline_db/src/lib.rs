//! Storage boundary for the airline console.
//!
//! Every statement the application runs goes through [`DbConnection`]:
//! parameters are always bound, never spliced into SQL text, and result rows
//! keep their column names so callers can address cells by name.
//!
//! # Usage
//!
//! ```rust,ignore
//! use airline_db::{DbConnection, DbValue};
//!
//! let db = DbConnection::open("~/.airline/airline.db")?;
//! db.execute("INSERT INTO airport (icao_code, name, city) VALUES (?, ?, ?)",
//!     &["EGLL".into(), "Heathrow".into(), "London".into()])?;
//! let rows = db.query_all("SELECT * FROM airport WHERE city = ?", &["London".into()])?;
//! ```

mod backend;
mod error;

pub use backend::{DbConnection, DbRow, DbValue, FromDbValue};
pub use error::{DbError, Result};
