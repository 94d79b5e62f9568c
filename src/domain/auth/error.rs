//! Authentication error taxonomy

use thiserror::Error;

use crate::domain::token::TokenError;
use crate::domain::DomainError;

/// Errors surfaced to the session handlers
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input, correctable by the client
    #[error("{0}")]
    Validation(String),

    /// Credentials were not accepted
    #[error("Invalid username or password")]
    Rejected,

    /// No provider registered under the requested method name
    #[error(
        "Authentication method '{method}' not available. Available methods: {}",
        .available.join(", ")
    )]
    UnknownMethod {
        method: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    Token(#[from] TokenError),

    /// Unexpected failure; the detail stays server-side
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => Self::Validation(message),
            other => Self::Internal(other.to_string()),
        }
    }
}
