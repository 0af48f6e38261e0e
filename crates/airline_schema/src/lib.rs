//! Schema-driven record framework
//!
//! # Philosophy: declare the columns once, validate everywhere
//!
//! Every entity and every report declares a [`TableDef`]: an ordered list of
//! [`ColumnDef`]s. From that single declaration the framework:
//!
//! 1. **Validates input**: keyboard input and stored cells both go through
//!    [`ColumnDef::parse_value`] (type, nullability, allowed values)
//! 2. **Builds filters**: [`SelectCondition`]s render to `column op ?`; values
//!    are always bound parameters, never spliced into SQL
//! 3. **Decodes rows**: result rows become [`Record`]s with one typed
//!    [`Value`] per declared column, or the decode fails as a whole
//! 4. **Drives selection**: list, display, and let the user pick one record
//!    (`0` aborts)
//!
//! # Modules
//!
//! - [`value`]: `DataType` and `Value`
//! - [`column`]: `ColumnDef` and its parsing rules
//! - [`condition`]: `SelectOperator`, `SelectCondition`, `Filter`
//! - [`table`]: `TableDef`
//! - [`console`]: the injectable prompt boundary

pub mod column;
pub mod condition;
pub mod console;
pub mod error;
pub mod record;
pub mod table;
pub mod value;

pub use column::{ColumnDef, NULL_SENTINEL};
pub use condition::{Filter, SelectCondition, SelectOperator};
pub use console::{
    confirm, select_in_range, select_index, Console, PickState, ScriptedConsole, TerminalConsole,
    ABORT_SENTINEL,
};
pub use error::{DecodeError, Result, SchemaError, TableError, ValidationError};
pub use record::Record;
pub use table::TableDef;
pub use value::{DataType, Value, DATE_FORMAT, TIMESTAMP_FORMAT};
