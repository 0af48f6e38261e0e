//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// The database file could not be opened or created
    pub fn database_unavailable(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot open database: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!(
                    "TRY: Check permissions on {}",
                    path.parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| ".".to_string())
                ),
                "TRY: Point at another file: airline --db ./airline.db".to_string(),
                "TRY: Show the resolved paths: airline config".to_string(),
            ])
    }

    /// config.toml exists but is unreadable or malformed
    pub fn invalid_config(path: &Path, reason: &str) -> Self {
        Self::new(format!("Invalid config file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Supported keys: database, log_filter".to_string(),
                format!("TRY: Move the file aside to use defaults: mv {0} {0}.bak", path.display()),
            ])
    }

    /// The session ended on an error that is not a rejected change
    pub fn session_aborted(reason: &str) -> Self {
        Self::new("Session aborted")
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Re-run with --verbose to see log output".to_string(),
                "TRY: Inspect the log files under the logs directory (airline config)".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_database_unavailable() {
        let err = HelpfulError::database_unavailable(
            &PathBuf::from("/readonly/airline.db"),
            "permission denied",
        );

        let display = err.to_string();
        assert!(display.contains("ERROR: Cannot open database: /readonly/airline.db"));
        assert!(display.contains("CONTEXT: permission denied"));
        assert!(display.contains("TRY: Check permissions on /readonly"));
    }

    #[test]
    fn test_invalid_config_names_keys() {
        let err = HelpfulError::invalid_config(&PathBuf::from("config.toml"), "unknown field");
        assert!(err.to_string().contains("database, log_filter"));
    }
}
