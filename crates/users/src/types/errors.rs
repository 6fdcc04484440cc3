//! Error types for the account subsystem.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Account-related errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserError {
    /// A required field is missing or malformed. Raised before any write.
    #[error("{message}")]
    RequiredField {
        field: &'static str,
        message: String,
    },

    /// The store already holds an account with this value.
    #[error("An account with this {field} already exists")]
    UniquenessConflict { field: String },

    /// A value falls outside its allowed set or length.
    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Account not found")]
    NotFound,

    #[error("Password hashing failed: {0}")]
    Password(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl UserError {
    pub fn required(field: &'static str, message: impl Into<String>) -> Self {
        UserError::RequiredField {
            field,
            message: message.into(),
        }
    }

    pub fn conflict(field: impl Into<String>) -> Self {
        UserError::UniquenessConflict {
            field: field.into(),
        }
    }
}

/// Result type for account operations
pub type UserResult<T> = Result<T, UserError>;

/// Convert database errors to our error types
impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => UserError::NotFound,
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    UserError::conflict(conflicting_column(db_err.message()))
                }
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    UserError::Constraint(db_err.message().to_string())
                }
                _ => UserError::Database(db_err.message().to_string()),
            },
            other => UserError::Database(other.to_string()),
        }
    }
}

/// Pull the column name out of "UNIQUE constraint failed: accounts.email".
fn conflicting_column(message: &str) -> String {
    let columns = message
        .rsplit_once(':')
        .map(|(_, columns)| columns)
        .unwrap_or(message);
    let first = columns.split(',').next().unwrap_or(columns).trim();
    first.rsplit('.').next().unwrap_or(first).to_string()
}
