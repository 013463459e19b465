//! Layered error definitions
//!
//! Categorized by source: config / io

use std::path::Path;

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the configuration file to parse and read failures
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::ConfigParse { message, source } => Self::ConfigParse {
                message: format!("{}: {message}", path.display()),
                source,
            },
            Self::Io(e) => Self::ConfigParse {
                message: format!("{}: cannot read file", path.display()),
                source: Some(Box::new(e)),
            },
            other => other,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
