//! Shared logging utilities for the airline console.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILTER: &str = "airline=info,airline_db=info,airline_schema=info";

/// Filter for the stderr layer when not verbose; keeps log lines out of prompts.
const QUIET_CONSOLE_FILTER: &str = "warn";

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "AIRLINE_HOME";

/// Logging configuration for airline binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
    /// Filter from the config file; `RUST_LOG` still wins.
    pub filter: Option<&'a str>,
    pub log_dir: PathBuf,
}

/// Initialize tracing with a daily rolling file writer and stderr output.
///
/// Returns the file writer's guard when the file layer is active; keep it
/// alive for the lifetime of the process so buffered lines are flushed.
pub fn init_logging(config: LogConfig<'_>) -> Result<Option<WorkerGuard>> {
    let file_filter = build_filter(config.filter)?;
    let directives = file_filter.to_string();
    let console_filter = if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new(QUIET_CONSOLE_FILTER)
    };

    let mut guard = None;
    let mut log_dir = None;
    let file_layer = match ensure_dir(&config.log_dir) {
        Ok(dir) => {
            log_dir = Some(dir.to_path_buf());
            let appender =
                tracing_appender::rolling::daily(dir, format!("{}.log", sanitize_name(config.app_name)));
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(file_filter),
            )
        }
        Err(err) => {
            eprintln!("Warning: failed to create logs directory: {:#}", err);
            None
        }
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match &log_dir {
        Some(dir) => info!(log_dir = %dir.display(), filter = %directives, "Logging initialized"),
        None => info!(filter = %directives, "Logging initialized without a log file"),
    }

    Ok(guard)
}

/// `RUST_LOG` if set, else the configured filter, else [`DEFAULT_LOG_FILTER`].
pub fn build_filter(configured: Option<&str>) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = configured.unwrap_or(DEFAULT_LOG_FILTER);
    EnvFilter::try_new(directives).with_context(|| format!("Invalid log filter: {}", directives))
}

/// Get the airline home directory: `$AIRLINE_HOME`, else `~/.airline`.
pub fn airline_home() -> PathBuf {
    resolve_home(std::env::var_os(HOME_ENV), dirs::home_dir())
}

/// Get the logs directory under a home directory.
pub fn logs_dir(home: &Path) -> PathBuf {
    home.join("logs")
}

fn resolve_home(override_path: Option<OsString>, home_dir: Option<PathBuf>) -> PathBuf {
    match (override_path, home_dir) {
        (Some(path), _) if !path.is_empty() => PathBuf::from(path),
        (_, Some(home)) => home.join(".airline"),
        // No home directory (some containers); fall back to the working directory
        (_, None) => PathBuf::from(".airline"),
    }
}

fn ensure_dir(dir: &Path) -> Result<&Path> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_override_wins() {
        let home = resolve_home(Some("/srv/airline".into()), Some(PathBuf::from("/home/ops")));
        assert_eq!(home, PathBuf::from("/srv/airline"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let home = resolve_home(Some(OsString::new()), Some(PathBuf::from("/home/ops")));
        assert_eq!(home, PathBuf::from("/home/ops/.airline"));
    }

    #[test]
    fn test_missing_home_falls_back_to_cwd() {
        assert_eq!(resolve_home(None, None), PathBuf::from(".airline"));
    }

    #[test]
    fn test_logs_dir_is_under_home() {
        assert_eq!(
            logs_dir(Path::new("/srv/airline")),
            PathBuf::from("/srv/airline/logs")
        );
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("airline console"), "airline_console");
        assert_eq!(sanitize_name("airline-1.0"), "airline-1_0");
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("logs");
        assert_eq!(ensure_dir(&nested).unwrap(), nested.as_path());
        assert!(nested.is_dir());
    }

    // The only test that installs the global subscriber.
    #[test]
    fn test_init_logging_writes_startup_line_to_log_file() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let temp = tempfile::tempdir().unwrap();
        let log_dir = temp.path().join("logs");

        let guard = init_logging(LogConfig {
            app_name: "airline test",
            verbose: false,
            filter: Some("airline_logging=info"),
            log_dir: log_dir.clone(),
        })
        .unwrap();
        assert!(guard.is_some());
        drop(guard);

        let contents: String = fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("airline_test.log"))
            })
            .map(|path| fs::read_to_string(path).unwrap())
            .collect();
        assert!(contents.contains("Logging initialized"));
        assert!(contents.contains("airline_logging=info"));
    }

    #[test]
    fn test_invalid_configured_filter_is_an_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(build_filter(Some("airline=loud")).is_err());
        assert!(build_filter(Some("airline=debug")).is_ok());
    }
}
