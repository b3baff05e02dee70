//! Error handling for campusbot
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the campusbot application
#[derive(Error, Debug)]
pub enum CampusBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for campusbot operations
pub type Result<T> = std::result::Result<T, CampusBotError>;

impl CampusBotError {
    /// True when the underlying database error is a unique-index violation.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(
            err,
            sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CampusBotError::ConstraintViolation("group name taken".to_string());
        assert_eq!(err.to_string(), "Constraint violation: group name taken");

        // Validation errors render bare so they can be shown to users as-is.
        let err = CampusBotError::Validation("Lesson number must be 1-8.".to_string());
        assert_eq!(err.to_string(), "Lesson number must be 1-8.");
    }
}
