//! Error types for quotebook-core

use thiserror::Error;

/// Result type alias using quotebook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to the user for failures that are not validation errors.
pub const DEFAULT_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Errors that can occur in quotebook-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// User input failed a business rule; the message is user-displayable.
    #[error("{0}")]
    Validation(String),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input that is not a user-facing rule (malformed ids, bad rows)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A list action was requested that the caller never wired up
    #[error("Action not available: {0}")]
    ActionUnavailable(&'static str),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error is a recoverable user-input failure.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message suitable for an alert: the validation text, or a fixed default.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            _ => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_shown_verbatim() {
        let error = Error::validation("Name is empty!");
        assert!(error.is_validation());
        assert_eq!(error.user_message(), "Name is empty!");
    }

    #[test]
    fn system_errors_use_default_message() {
        let error = Error::NotFound("quote".into());
        assert!(!error.is_validation());
        assert_eq!(error.user_message(), DEFAULT_ERROR_MESSAGE);
    }
}
