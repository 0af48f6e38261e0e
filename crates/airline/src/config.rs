//! Configuration paths and the optional `config.toml`.
//!
//! Everything lives under the airline home (`$AIRLINE_HOME`, else
//! `~/.airline`):
//!
//! ```text
//! ~/.airline/
//!   config.toml   optional
//!   airline.db    default database
//!   logs/         daily rolling log files
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_DB_FILE_NAME: &str = "airline.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Database file; relative paths are resolved against the home directory.
    pub database: Option<PathBuf>,
    /// Tracing filter directives, e.g. `airline=debug`.
    pub log_filter: Option<String>,
}

impl FileConfig {
    /// Load a config file. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path).map(Some)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where the database path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseSource {
    CommandLine,
    ConfigFile,
    Default,
}

impl DatabaseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseSource::CommandLine => "command line",
            DatabaseSource::ConfigFile => "config file",
            DatabaseSource::Default => "default",
        }
    }
}

/// Resolved configuration for one run.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub config_file_found: bool,
    pub database: PathBuf,
    pub database_source: DatabaseSource,
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Resolve paths under `home`.
    ///
    /// Priority for the database path:
    /// 1. `cli_database` (the `--db` flag)
    /// 2. `database` in `config.toml`
    /// 3. `<home>/airline.db`
    pub fn resolve(home: PathBuf, cli_database: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = home.join(CONFIG_FILE_NAME);
        let file = FileConfig::load(&config_file)?;
        let config_file_found = file.is_some();
        let file = file.unwrap_or_default();

        let (database, database_source) = match (cli_database, file.database) {
            (Some(path), _) => (path, DatabaseSource::CommandLine),
            (None, Some(path)) if path.is_relative() => (home.join(path), DatabaseSource::ConfigFile),
            (None, Some(path)) => (path, DatabaseSource::ConfigFile),
            (None, None) => (home.join(DEFAULT_DB_FILE_NAME), DatabaseSource::Default),
        };

        Ok(Self {
            home,
            config_file,
            config_file_found,
            database,
            database_source,
            log_filter: file.log_filter,
        })
    }

    /// Get logs directory: <home>/logs
    pub fn logs_dir(&self) -> PathBuf {
        airline_logging::logs_dir(&self.home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(home: &Path, content: &str) {
        std::fs::write(home.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::resolve(temp.path().to_path_buf(), None).unwrap();

        assert!(!config.config_file_found);
        assert_eq!(config.database, temp.path().join("airline.db"));
        assert_eq!(config.database_source, DatabaseSource::Default);
        assert_eq!(config.logs_dir(), temp.path().join("logs"));
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_config_file_database_is_relative_to_home() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            "database = \"data/ops.db\"\nlog_filter = \"airline=debug\"\n",
        );

        let config = AppConfig::resolve(temp.path().to_path_buf(), None).unwrap();
        assert!(config.config_file_found);
        assert_eq!(config.database, temp.path().join("data/ops.db"));
        assert_eq!(config.database_source, DatabaseSource::ConfigFile);
        assert_eq!(config.log_filter.as_deref(), Some("airline=debug"));
    }

    #[test]
    fn test_command_line_wins_over_config_file() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "database = \"/var/lib/airline.db\"\n");

        let config =
            AppConfig::resolve(temp.path().to_path_buf(), Some(PathBuf::from("local.db"))).unwrap();
        assert_eq!(config.database, PathBuf::from("local.db"));
        assert_eq!(config.database_source, DatabaseSource::CommandLine);
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "databse = \"typo.db\"\n");

        let err = AppConfig::resolve(temp.path().to_path_buf(), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_string(&DatabaseSource::CommandLine).unwrap();
        assert_eq!(json, "\"command_line\"");
    }
}
