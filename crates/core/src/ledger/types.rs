//! Ledger domain types: account and transaction classifications.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry type, derived from the sign of `amount`: negative is a debit,
/// non-negative is a credit. Never stored as a column — computed on read,
/// per the engine's "derived column is a view concern" design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry (signed amount is negative).
    Debit,
    /// Credit entry (signed amount is non-negative).
    Credit,
}

impl EntryType {
    /// Derives the entry type from a signed amount.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

/// Transaction type classification (`transaction_types.type_code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Credit to a single account with no counterparty leg.
    Deposit,
    /// Debit from a single account with no counterparty leg.
    Withdrawal,
    /// Paired debit/credit between two accounts.
    Transfer,
    /// Outbound payment, recorded like a withdrawal.
    Payment,
    /// System-generated interest credit.
    Interest,
    /// System-generated fee debit.
    Fee,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Transfer => "TRANSFER",
            Self::Payment => "PAYMENT",
            Self::Interest => "INTEREST",
            Self::Fee => "FEE",
        };
        write!(f, "{s}")
    }
}

/// Transaction (header) lifecycle status.
///
/// `pending -> completed` or `pending -> failed` inside one write
/// transaction; `reversed` is a logical marker applied to an earlier
/// transaction once a compensating reversal has been posted, never an
/// in-place edit of its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting commit; mutable only up to this point.
    Pending,
    /// Committed successfully; immutable.
    Completed,
    /// Rolled back; immutable.
    Failed,
    /// Superseded by a compensating reversal transaction; immutable.
    Reversed,
}

impl TransactionStatus {
    /// Returns true once the transaction has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Reversed)
    }
}

/// Account type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Interest-bearing savings account.
    Savings,
    /// Everyday transactional account.
    Checking,
    /// Stored-value wallet account.
    Wallet,
    /// Loan account; balance represents amount owed and may be negative.
    Loan,
}

impl AccountType {
    /// Returns true if this account type is exempt from the
    /// non-negative-balance invariant (I2).
    #[must_use]
    pub const fn is_loan(self) -> bool {
        matches!(self, Self::Loan)
    }
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Normal operating status; accepts all mutations.
    Active,
    /// Rejects all mutations; can return to `Active`.
    Frozen,
    /// Terminal; cannot be reopened.
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_from_amount() {
        assert_eq!(
            EntryType::from_amount(Decimal::new(-100, 2)),
            EntryType::Debit
        );
        assert_eq!(
            EntryType::from_amount(Decimal::new(100, 2)),
            EntryType::Credit
        );
        assert_eq!(EntryType::from_amount(Decimal::ZERO), EntryType::Credit);
    }

    #[test]
    fn test_transaction_type_display() {
        assert_eq!(TransactionType::Deposit.to_string(), "DEPOSIT");
        assert_eq!(TransactionType::Transfer.to_string(), "TRANSFER");
    }

    #[test]
    fn test_transaction_status_terminal() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
        assert!(TransactionStatus::Reversed.is_terminal());
    }

    #[test]
    fn test_account_type_is_loan() {
        assert!(AccountType::Loan.is_loan());
        assert!(!AccountType::Savings.is_loan());
        assert!(!AccountType::Checking.is_loan());
        assert!(!AccountType::Wallet.is_loan());
    }
}
