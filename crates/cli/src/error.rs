//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Log file not found
    #[error("Log file not found: {}", path.display())]
    LogNotFound { path: PathBuf },

    /// Log file could not be read
    #[error("Failed to read log {}: {source}", path.display())]
    LogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },
}

impl CliError {
    pub fn log_not_found(path: impl Into<PathBuf>) -> Self {
        Self::LogNotFound { path: path.into() }
    }

    pub fn log_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogRead {
            path: path.into(),
            source,
        }
    }

    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
