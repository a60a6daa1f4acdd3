use thiserror::Error;

/// Crate-wide error type for notification rendering and dispatch.
///
/// Transport and template failures are isolated per channel by the
/// notification manager; they never reach the business-logic caller
/// through `push`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A function template refused to render the snapshot
    #[error("Template rendering failed: {message}")]
    Template { message: String },

    /// The request never produced a response (DNS, connect, timeout, ...)
    #[error("Request to {target} failed")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-2xx status
    #[error("Request to {target} was rejected with status {status}")]
    HttpStatus {
        target: String,
        status: u16,
        body: Option<String>,
    },

    /// JSON encoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand used by function templates to reject a snapshot
    pub fn template(message: impl Into<String>) -> Self {
        AppError::Template {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Message followed by every underlying cause, `outer: inner: root`
    pub fn report(self) -> String {
        format!("{:#}", anyhow::Error::new(self))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
