//! Errors raised while loading settings

use std::path::PathBuf;

use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required TOML file does not exist
    #[error("Required configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Sources merged but do not match the settings shape
    #[error("Failed to deserialize configuration: {0}")]
    Parse(String),

    #[error("Invalid setting {field}: {message}")]
    Invalid { field: String, message: String },

    /// Both the directory and the single-file location were given
    #[error("Conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Dotted key the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Configuration {
            key: error.field().unwrap_or("settings").to_string(),
            source: anyhow::Error::new(error),
        }
    }
}
