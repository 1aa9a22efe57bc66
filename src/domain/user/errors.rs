use uuid::Uuid;

use super::value_objects::{USERNAME_MAX_CHARS, USERNAME_MIN_CHARS};
use crate::error::{DomainError, ErrorKind};

// ============================================================================
// User Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UserError {
    #[error("{0} is required")]
    FieldMissing(&'static str),

    #[error(
        "Username must be between {min} and {max} characters (got {0})",
        min = USERNAME_MIN_CHARS,
        max = USERNAME_MAX_CHARS
    )]
    UsernameLength(usize),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid user ID format: '{0}'")]
    MalformedId(String),

    #[error("User {0} not found")]
    NotFound(Uuid),

    #[error("Points to redeem must be at least 1 (got {0})")]
    InvalidAmount(i64),

    #[error("Insufficient loyalty points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u64, available: u64 },
}

impl DomainError for UserError {
    fn kind(&self) -> ErrorKind {
        match self {
            UserError::FieldMissing(_)
            | UserError::UsernameLength(_)
            | UserError::InvalidEmail(_)
            | UserError::MalformedId(_)
            | UserError::InvalidAmount(_) => ErrorKind::Validation,
            UserError::NotFound(_) => ErrorKind::NotFound,
            UserError::DuplicateUsername(_)
            | UserError::DuplicateEmail(_)
            | UserError::InsufficientPoints { .. } => ErrorKind::Conflict,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            UserError::FieldMissing(_) | UserError::UsernameLength(_) | UserError::InvalidEmail(_) => {
                "INVALID_INPUT"
            }
            UserError::DuplicateUsername(_) => "USERNAME_TAKEN",
            UserError::DuplicateEmail(_) => "EMAIL_TAKEN",
            UserError::MalformedId(_) => "INVALID_USER_ID",
            UserError::NotFound(_) => "USER_NOT_FOUND",
            UserError::InvalidAmount(_) => "INVALID_POINTS",
            UserError::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
        }
    }
}
