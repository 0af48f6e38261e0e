//! `airline config`: show the resolved paths.

use airline::AppConfig;

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Show resolved paths in JSON format
    #[arg(long)]
    pub json: bool,
}

pub fn run(config: &AppConfig, args: ConfigArgs) -> anyhow::Result<()> {
    let logs = config.logs_dir();

    if args.json {
        let report = serde_json::json!({
            "home": config.home.to_string_lossy(),
            "config_file": {
                "path": config.config_file.to_string_lossy(),
                "exists": config.config_file_found,
            },
            "database": {
                "path": config.database.to_string_lossy(),
                "source": config.database_source,
                "exists": config.database.exists(),
            },
            "logs": {
                "path": logs.to_string_lossy(),
                "exists": logs.exists(),
            },
            "log_filter": config.log_filter,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("AIRLINE CONFIGURATION");
        println!("=====================");
        println!();
        println!("Home:     {}", config.home.display());
        println!(
            "Config:   {} ({})",
            config.config_file.display(),
            if config.config_file_found { "loaded" } else { "not found" }
        );
        println!();
        println!("Database: {}", config.database.display());
        println!("          source: {}", config.database_source.as_str());
        println!(
            "          exists: {}",
            if config.database.exists() { "yes" } else { "no" }
        );
        println!();
        println!("Logs:     {}", logs.display());
        println!(
            "Filter:   {}",
            config
                .log_filter
                .as_deref()
                .unwrap_or(airline_logging::DEFAULT_LOG_FILTER)
        );
    }

    Ok(())
}
