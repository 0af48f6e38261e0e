//! Airline console launcher
//!
//! - **run** (default): interactive menu over the airline database
//! - **init**: create the tables and exit
//! - **config**: show resolved paths

use airline::AppConfig;
use airline_logging::{airline_home, init_logging, LogConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "airline", version, about = "Interactive console for airline operations data")]
struct Cli {
    /// Database file (overrides config.toml)
    #[arg(long, global = true, env = "AIRLINE_DB")]
    db: Option<PathBuf>,

    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive session (default)
    Run(cli::session::RunArgs),

    /// Create the database tables and exit
    Init,

    /// Show configuration paths
    Config(cli::config::ConfigArgs),
}

fn run_command(config: &AppConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => cli::session::run(config, args),
        Commands::Init => cli::session::init(config),
        Commands::Config(args) => cli::config::run(config, args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::resolve(airline_home(), cli.db) {
        Ok(config) => config,
        Err(err) => {
            let path = airline_home().join(airline::config::CONFIG_FILE_NAME);
            eprintln!("{}", cli::error::HelpfulError::invalid_config(&path, &err.to_string()));
            return ExitCode::from(2);
        }
    };

    // Keep the guard alive until exit so buffered log lines reach the file
    let _log_guard = match init_logging(LogConfig {
        app_name: "airline",
        verbose: cli.verbose,
        filter: config.log_filter.as_deref(),
        log_dir: config.logs_dir(),
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: logging disabled: {:#}", err);
            None
        }
    };

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(cli::session::RunArgs::default()));

    match run_command(&config, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
