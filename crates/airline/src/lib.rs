//! Airline console - core library
//!
//! Entity tables (airports, pilots, flights, assignments), the derived
//! reports and the interactive session, all built on `airline_schema`.

pub mod config;
pub mod entities;
pub mod error;
pub mod reports;
pub mod session;

pub use config::AppConfig;
pub use entities::{create_all_tables, Entities};
pub use error::AppError;
pub use session::{Action, Session, SessionSummary};
