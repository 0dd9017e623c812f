//! Request payload validation errors

use thiserror::Error;

/// A request value that failed validation (HTTP 400)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be an integer, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },
}
