//! Ledger error types for validation and state errors.
//!
//! Variants mirror the error kinds of spec.md §7 (`InvalidInput`,
//! `NotFound`, `PreconditionFailed`, `Duplicate`, `Conflict`, `Internal`)
//! but each carries the specific business context a caller needs, matching
//! the teacher's two-tier design: a leaf `thiserror` enum here, converted
//! into the crate-spanning `AppError` at the boundary.

use ledger_shared::error::AppError;
use ledger_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Amount is zero, negative, or has more than 4 fractional digits.
    #[error("amount must be positive with at most 4 fractional digits")]
    InvalidAmount,

    /// Sender and receiver of a transfer are the same account.
    #[error("sender and receiver accounts must differ")]
    SameAccount,

    /// Account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account exists but is not active (frozen or closed).
    #[error("account {0} is not active")]
    AccountNotActive(AccountId),

    /// Sender and receiver currencies differ.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency expected (sender's).
        expected: String,
        /// Currency actually found (receiver's).
        found: String,
    },

    /// Resulting balance would go negative on a non-loan account.
    #[error("account {account_id} has insufficient funds: balance {balance}, requested {amount}")]
    InsufficientFunds {
        /// The account short on funds.
        account_id: AccountId,
        /// Current balance.
        balance: Decimal,
        /// Amount requested.
        amount: Decimal,
    },

    /// A `reference_id` has already been used by a pending or failed
    /// transaction; the caller must not be silently resumed.
    #[error("reference_id {0} already used by a non-completed transaction")]
    DuplicateReference(Uuid),

    /// Referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// User exists but is deactivated.
    #[error("user {0} is not active")]
    UserNotActive(UserId),

    /// One-account-per-user policy rejected a second open account.
    #[error("user {0} has reached their open-account limit")]
    AccountLimitReached(UserId),

    /// `CloseAccount` attempted on an account with a non-zero balance.
    #[error("account {0} has a non-zero balance and cannot be closed")]
    NonZeroBalance(AccountId),

    /// `CloseAccount` attempted on an already-closed account.
    #[error("account {0} is already closed")]
    AlreadyClosed(AccountId),

    /// Mutation attempted on a closed account (closed accounts cannot
    /// even be frozen/unfrozen again).
    #[error("account {0} is closed")]
    AccountClosed(AccountId),

    /// Serialization failure or lock-acquisition timeout; retryable.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store failure or unexpected invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns true if retrying the same operation unmodified may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount | LedgerError::CurrencyMismatch { .. } => {
                Self::InvalidInput(err.to_string())
            }
            LedgerError::AccountNotFound(_) | LedgerError::UserNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::SameAccount
            | LedgerError::AccountNotActive(_)
            | LedgerError::InsufficientFunds { .. }
            | LedgerError::UserNotActive(_)
            | LedgerError::AccountLimitReached(_)
            | LedgerError::NonZeroBalance(_)
            | LedgerError::AlreadyClosed(_)
            | LedgerError::AccountClosed(_) => Self::PreconditionFailed(err.to_string()),
            LedgerError::DuplicateReference(_) => Self::Duplicate(err.to_string()),
            LedgerError::Conflict(msg) => Self::Conflict(msg),
            LedgerError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_conflict_is_retryable() {
        assert!(LedgerError::Conflict("retry".into()).is_retryable());
        assert!(!LedgerError::InvalidAmount.is_retryable());
        assert!(!LedgerError::NonZeroBalance(AccountId::new()).is_retryable());
    }

    #[test]
    fn test_app_error_conversion_kinds() {
        assert!(matches!(
            AppError::from(LedgerError::InvalidAmount),
            AppError::InvalidInput(_)
        ));
        assert!(matches!(
            AppError::from(LedgerError::AccountNotFound(AccountId::new())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(LedgerError::InsufficientFunds {
                account_id: AccountId::new(),
                balance: Decimal::ZERO,
                amount: Decimal::ONE,
            }),
            AppError::PreconditionFailed(_)
        ));
        assert!(matches!(
            AppError::from(LedgerError::DuplicateReference(Uuid::nil())),
            AppError::Duplicate(_)
        ));
        assert!(matches!(
            AppError::from(LedgerError::Conflict("x".into())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(LedgerError::Internal("x".into())),
            AppError::Internal(_)
        ));
    }
}
