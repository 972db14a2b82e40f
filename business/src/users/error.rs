use thiserror::Error;

use super::validation::ValidationErrors;
use crate::http::HttpError;

/// Errors surfaced by [`crate::UserDirectoryClient`].
///
/// None of these are retried; the cache keeps its last good state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserDirectoryError {
    /// The payload failed local checks. No request was sent.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No response: connection refused, DNS failure, body cut short.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("{message} (status {status})")]
    Remote { status: u16, message: String },

    /// A 2xx response whose body matched none of the known shapes.
    #[error("Failed to parse {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error(transparent)]
    Cache(#[from] userdir_states::Error),
}

impl UserDirectoryError {
    pub fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what,
            message: err.to_string(),
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for UserDirectoryError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<HttpError> for UserDirectoryError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.message)
    }
}

pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;
