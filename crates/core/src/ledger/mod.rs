//! Double-entry bookkeeping logic.
//!
//! This module implements the pure, zero-database half of the ledger
//! engine: domain types, the invariant guards as pre-commit predicates,
//! balance arithmetic, and transaction planning. `ledger-db` supplies the
//! impure half (row locks, writes, the actual `DatabaseTransaction`).

pub mod balance;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::balance_after;
pub use error::LedgerError;
pub use service::{LedgerService, ResolvedEntry, TransferPlan};
pub use types::{AccountStatus, AccountType, EntryType, TransactionStatus, TransactionType};
pub use validation::AccountInfo;
