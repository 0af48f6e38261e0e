//! `airline run` / `airline init`

use airline::{create_all_tables, AppConfig, Session};
use airline_db::DbConnection;
use airline_schema::TerminalConsole;
use anyhow::Result;
use tracing::info;

use crate::cli::error::HelpfulError;

/// Arguments for the interactive session
#[derive(Debug, Default, clap::Args)]
pub struct RunArgs {
    /// Do not clear the screen between steps
    #[arg(long)]
    pub keep_scrollback: bool,
}

fn open_database(config: &AppConfig) -> Result<DbConnection> {
    let conn = DbConnection::open(&config.database).map_err(|err| {
        HelpfulError::database_unavailable(&config.database, &err.to_string())
    })?;
    create_all_tables(&conn).map_err(|err| {
        HelpfulError::database_unavailable(&config.database, &err.to_string())
    })?;
    Ok(conn)
}

/// Create the tables and exit.
pub fn init(config: &AppConfig) -> Result<()> {
    open_database(config)?;
    println!("Database ready: {}", config.database.display());
    Ok(())
}

/// Run the interactive menu on the terminal.
pub fn run(config: &AppConfig, args: RunArgs) -> Result<()> {
    let conn = open_database(config)?;
    let session = Session::new(&conn)?;
    let mut console = TerminalConsole {
        keep_scrollback: args.keep_scrollback,
    };

    let summary = session
        .run(&mut console)
        .map_err(|err| HelpfulError::session_aborted(&err.to_string()))?;

    info!(actions = summary.actions, rejected = summary.rejected, "Goodbye");
    Ok(())
}
