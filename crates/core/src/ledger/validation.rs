//! Invariant Guards: pre-commit predicates the engine calls before every
//! write. Implemented twice per spec.md §4.2 — this is the primary, portable
//! copy; `ledger-db`'s migration carries a second copy as Postgres `CHECK`
//! constraints and a deferred trigger for defense in depth.

use ledger_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{AccountStatus, AccountType};

/// The subset of account state the invariant guards need. Supplied by the
/// repository after it has acquired the row's exclusive lock — the guards
/// themselves never read the store.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// The account's id.
    pub id: AccountId,
    /// The account's owning user.
    pub user_id: UserId,
    /// Savings/checking/wallet/loan.
    pub account_type: AccountType,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Active/frozen/closed.
    pub status: AccountStatus,
    /// Balance as of the lock acquisition.
    pub current_balance: Decimal,
}

impl AccountInfo {
    fn ensure_active(&self) -> Result<(), LedgerError> {
        match self.status {
            AccountStatus::Active => Ok(()),
            AccountStatus::Frozen | AccountStatus::Closed => {
                Err(LedgerError::AccountNotActive(self.id))
            }
        }
    }

    fn would_go_negative(&self, resulting_balance: Decimal) -> bool {
        !self.account_type.is_loan() && resulting_balance < Decimal::ZERO
    }
}

fn ensure_valid_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    if amount.scale() > 4 {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}

/// Validates a `Transfer(sender, receiver, amount)` call.
///
/// # Errors
///
/// Returns the first violated invariant: `InvalidAmount`, `SameAccount`,
/// `AccountNotActive`, `CurrencyMismatch`, or `InsufficientFunds`.
pub fn validate_transfer(
    sender: &AccountInfo,
    receiver: &AccountInfo,
    amount: Decimal,
) -> Result<(), LedgerError> {
    ensure_valid_amount(amount)?;

    if sender.id == receiver.id {
        return Err(LedgerError::SameAccount);
    }

    sender.ensure_active()?;
    receiver.ensure_active()?;

    if sender.currency != receiver.currency {
        return Err(LedgerError::CurrencyMismatch {
            expected: sender.currency.clone(),
            found: receiver.currency.clone(),
        });
    }

    let resulting = sender.current_balance - amount;
    if sender.would_go_negative(resulting) {
        return Err(LedgerError::InsufficientFunds {
            account_id: sender.id,
            balance: sender.current_balance,
            amount,
        });
    }

    Ok(())
}

/// Validates a `Deposit(account, amount)` call.
///
/// # Errors
///
/// Returns `InvalidAmount` or `AccountNotActive`.
pub fn validate_deposit(account: &AccountInfo, amount: Decimal) -> Result<(), LedgerError> {
    ensure_valid_amount(amount)?;
    account.ensure_active()?;
    Ok(())
}

/// Validates a `Withdraw(account, amount)` call.
///
/// # Errors
///
/// Returns `InvalidAmount`, `AccountNotActive`, or `InsufficientFunds`.
pub fn validate_withdraw(account: &AccountInfo, amount: Decimal) -> Result<(), LedgerError> {
    ensure_valid_amount(amount)?;
    account.ensure_active()?;

    let resulting = account.current_balance - amount;
    if account.would_go_negative(resulting) {
        return Err(LedgerError::InsufficientFunds {
            account_id: account.id,
            balance: account.current_balance,
            amount,
        });
    }

    Ok(())
}

/// Validates a `CreateAccount(userId, ...)` call.
///
/// `open_account_count` is the caller's count of the user's currently
/// non-closed accounts, read under lock by the repository.
///
/// # Errors
///
/// Returns `UserNotActive` or `AccountLimitReached`.
pub fn validate_create_account(
    user_id: UserId,
    user_is_active: bool,
    open_account_count: u32,
    one_account_per_user: bool,
) -> Result<(), LedgerError> {
    if !user_is_active {
        return Err(LedgerError::UserNotActive(user_id));
    }
    if one_account_per_user && open_account_count > 0 {
        return Err(LedgerError::AccountLimitReached(user_id));
    }
    Ok(())
}

/// Validates a `FreezeAccount(account)` toggle and returns the new status.
///
/// # Errors
///
/// Returns `AccountClosed` if the account is already closed.
pub fn validate_freeze(account: &AccountInfo) -> Result<AccountStatus, LedgerError> {
    match account.status {
        AccountStatus::Active => Ok(AccountStatus::Frozen),
        AccountStatus::Frozen => Ok(AccountStatus::Active),
        AccountStatus::Closed => Err(LedgerError::AccountClosed(account.id)),
    }
}

/// Validates a `CloseAccount(account)` call.
///
/// # Errors
///
/// Returns `AlreadyClosed` or `NonZeroBalance`.
pub fn validate_close(account: &AccountInfo) -> Result<(), LedgerError> {
    if matches!(account.status, AccountStatus::Closed) {
        return Err(LedgerError::AlreadyClosed(account.id));
    }
    if account.current_balance != Decimal::ZERO {
        return Err(LedgerError::NonZeroBalance(account.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_account(
        account_type: AccountType,
        status: AccountStatus,
        balance: Decimal,
        currency: &str,
    ) -> AccountInfo {
        AccountInfo {
            id: AccountId::new(),
            user_id: UserId::new(),
            account_type,
            currency: currency.to_string(),
            status,
            current_balance: balance,
        }
    }

    #[test]
    fn test_validate_transfer_happy_path() {
        let sender = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(100),
            "USD",
        );
        let receiver = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(validate_transfer(&sender, &receiver, dec!(50)).is_ok());
    }

    #[test]
    fn test_validate_transfer_zero_amount() {
        let sender = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(100),
            "USD",
        );
        let receiver = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_transfer(&sender, &receiver, dec!(0)),
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[test]
    fn test_validate_transfer_negative_amount() {
        let sender = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(100),
            "USD",
        );
        let receiver = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_transfer(&sender, &receiver, dec!(-10)),
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[test]
    fn test_validate_transfer_same_account() {
        let account = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(100),
            "USD",
        );
        let mut receiver = account.clone();
        receiver.id = account.id;
        assert!(matches!(
            validate_transfer(&account, &receiver, dec!(10)),
            Err(LedgerError::SameAccount)
        ));
    }

    #[test]
    fn test_validate_transfer_inactive_sender() {
        let sender = make_account(
            AccountType::Checking,
            AccountStatus::Frozen,
            dec!(100),
            "USD",
        );
        let receiver = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_transfer(&sender, &receiver, dec!(10)),
            Err(LedgerError::AccountNotActive(_))
        ));
    }

    #[test]
    fn test_validate_transfer_currency_mismatch() {
        let sender = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(100),
            "USD",
        );
        let receiver = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "INR",
        );
        assert!(matches!(
            validate_transfer(&sender, &receiver, dec!(10)),
            Err(LedgerError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_transfer_insufficient_funds() {
        let sender = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(10),
            "USD",
        );
        let receiver = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_transfer(&sender, &receiver, dec!(50)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_validate_transfer_loan_account_may_go_negative() {
        let sender = make_account(AccountType::Loan, AccountStatus::Active, dec!(0), "USD");
        let receiver = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(validate_transfer(&sender, &receiver, dec!(500)).is_ok());
    }

    #[test]
    fn test_validate_withdraw_insufficient_funds() {
        let account = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(700),
            "USD",
        );
        assert!(matches!(
            validate_withdraw(&account, dec!(1000)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_validate_deposit_rejects_frozen() {
        let account = make_account(
            AccountType::Checking,
            AccountStatus::Frozen,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_deposit(&account, dec!(10)),
            Err(LedgerError::AccountNotActive(_))
        ));
    }

    #[test]
    fn test_validate_create_account_enforces_limit() {
        let user_id = UserId::new();
        assert!(validate_create_account(user_id, true, 0, true).is_ok());
        assert!(matches!(
            validate_create_account(user_id, true, 1, true),
            Err(LedgerError::AccountLimitReached(_))
        ));
        // When the policy is disabled, multiple open accounts are fine.
        assert!(validate_create_account(user_id, true, 1, false).is_ok());
    }

    #[test]
    fn test_validate_create_account_inactive_user() {
        let user_id = UserId::new();
        assert!(matches!(
            validate_create_account(user_id, false, 0, true),
            Err(LedgerError::UserNotActive(_))
        ));
    }

    #[test]
    fn test_validate_freeze_toggles() {
        let active = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_freeze(&active),
            Ok(AccountStatus::Frozen)
        ));

        let frozen = make_account(
            AccountType::Checking,
            AccountStatus::Frozen,
            dec!(0),
            "USD",
        );
        assert!(matches!(validate_freeze(&frozen), Ok(AccountStatus::Active)));
    }

    #[test]
    fn test_validate_freeze_rejects_closed() {
        let closed = make_account(
            AccountType::Checking,
            AccountStatus::Closed,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_freeze(&closed),
            Err(LedgerError::AccountClosed(_))
        ));
    }

    #[test]
    fn test_validate_close_requires_zero_balance() {
        let account = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(10),
            "USD",
        );
        assert!(matches!(
            validate_close(&account),
            Err(LedgerError::NonZeroBalance(_))
        ));
    }

    #[test]
    fn test_validate_close_rejects_already_closed() {
        let account = make_account(
            AccountType::Checking,
            AccountStatus::Closed,
            dec!(0),
            "USD",
        );
        assert!(matches!(
            validate_close(&account),
            Err(LedgerError::AlreadyClosed(_))
        ));
    }

    #[test]
    fn test_validate_close_happy_path() {
        let account = make_account(
            AccountType::Checking,
            AccountStatus::Active,
            dec!(0),
            "USD",
        );
        assert!(validate_close(&account).is_ok());
    }
}
