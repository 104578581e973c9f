use thiserror::Error;

use crate::errors::StoreError;
use crate::types::internal::audit::EventType;

/// Message shared by every failed login, whatever the cause
pub const WRONG_CREDENTIAL: &str = "wrong credential";

/// Errors surfaced by the auth service
///
/// `AuditWrite` is kept apart from `Storage` so a caller can tell that the primary
/// action may already be committed (see `committed_id`) while its audit record is missing.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Account not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),

    #[error("Audit write failed for {event_type} event")]
    AuditWrite {
        event_type: EventType,
        committed_id: Option<String>,
        #[source]
        source: StoreError,
    },

    /// Hashing or signing failed
    #[error("Internal error: {operation} failed: {message}")]
    Internal {
        operation: String,
        message: String,
    },
}

impl AuthError {
    pub fn email_conflict() -> Self {
        Self::Conflict("email already registered".to_string())
    }

    pub fn wrong_credential() -> Self {
        Self::Forbidden(WRONG_CREDENTIAL.to_string())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken(reason.into())
    }

    pub fn internal(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Stable identifier for the error kind, for request-handling layers
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidToken(_) => "invalid_token",
            Self::Storage(_) => "storage_error",
            Self::AuditWrite { .. } => "audit_write_failed",
            Self::Internal { .. } => "internal_error",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => Self::Conflict(message),
            other => Self::Storage(other),
        }
    }
}
