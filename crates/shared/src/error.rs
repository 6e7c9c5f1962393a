//! Application-wide error types.
//!
//! The variants here are the closed set of error kinds from the ledger
//! engine's external contract: callers branch on the kind, never on a
//! free-text message.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed, missing, or out-of-range argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks the privilege to perform the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization failure, lock contention, or other retryable condition.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A business rule rejected the mutation (insufficient funds, frozen
    /// account, non-zero close, same-account transfer, currency mismatch,
    /// account-per-user limit, ...).
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// A `reference_id` has already been used by another transaction.
    #[error("Duplicate reference: {0}")]
    Duplicate(String),

    /// Store failure, account-number retry exhaustion, or an unexpected
    /// invariant violation. Logged with full context; never shown verbatim
    /// to end users.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for programmatic matching by callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Conflict(_) => "CONFLICT",
            Self::PreconditionFailed(_) => "PRECONDITION_FAILED",
            Self::Duplicate(_) => "DUPLICATE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Returns true if retrying the same operation unmodified may succeed.
    ///
    /// Only `Conflict` is retryable: it signals a transient serialization
    /// failure or lock timeout at the store, not a business rule.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_codes() {
        assert_eq!(AppError::InvalidInput("x".into()).error_code(), "INVALID_INPUT");
        assert_eq!(AppError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Forbidden("x".into()).error_code(), "FORBIDDEN");
        assert_eq!(AppError::Conflict("x".into()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::PreconditionFailed("x".into()).error_code(),
            "PRECONDITION_FAILED"
        );
        assert_eq!(AppError::Duplicate("x".into()).error_code(), "DUPLICATE");
        assert_eq!(AppError::Internal("x".into()).error_code(), "INTERNAL");
    }

    #[test]
    fn test_only_conflict_is_retryable() {
        assert!(AppError::Conflict("retry me".into()).is_retryable());
        assert!(!AppError::InvalidInput("x".into()).is_retryable());
        assert!(!AppError::PreconditionFailed("x".into()).is_retryable());
        assert!(!AppError::Duplicate("x".into()).is_retryable());
        assert!(!AppError::Internal("x".into()).is_retryable());
    }

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            format!("{}", AppError::PreconditionFailed("insufficient funds".into())),
            "Precondition failed: insufficient funds"
        );
    }
}
