//! Property-based tests for the invariant guards in [`super::validation`].

use proptest::prelude::*;
use rust_decimal::Decimal;

use ledger_shared::types::{AccountId, UserId};

use super::error::LedgerError;
use super::types::{AccountStatus, AccountType};
use super::validation::{validate_create_account, validate_deposit, validate_transfer, validate_withdraw, AccountInfo};

/// A valid amount: positive, at most 4 decimal places.
fn valid_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|hundredths_of_cents| Decimal::new(hundredths_of_cents, 4))
}

/// A non-positive amount: zero or negative.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=0i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn non_loan_account_type() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Savings),
        Just(AccountType::Checking),
        Just(AccountType::Wallet),
    ]
}

fn make_account(account_type: AccountType, status: AccountStatus, balance: Decimal) -> AccountInfo {
    AccountInfo {
        id: AccountId::new(),
        user_id: UserId::new(),
        account_type,
        currency: "USD".to_string(),
        status,
        current_balance: balance,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// I3: a non-positive amount is always rejected by every operation that
    /// moves money, regardless of account state.
    #[test]
    fn prop_non_positive_amount_always_rejected(
        account_type in non_loan_account_type(),
        balance in valid_amount(),
        amount in non_positive_amount(),
    ) {
        let account = make_account(account_type, AccountStatus::Active, balance);
        prop_assert!(matches!(
            validate_deposit(&account, amount),
            Err(LedgerError::InvalidAmount)
        ));
        prop_assert!(matches!(
            validate_withdraw(&account, amount),
            Err(LedgerError::InvalidAmount)
        ));
        let other = make_account(account_type, AccountStatus::Active, balance);
        prop_assert!(matches!(
            validate_transfer(&account, &other, amount),
            Err(LedgerError::InvalidAmount)
        ));
    }

    /// I2: a non-loan account can never be validated into a negative
    /// balance by a withdrawal or an outgoing transfer.
    #[test]
    fn prop_non_loan_withdraw_never_goes_negative(
        account_type in non_loan_account_type(),
        balance in valid_amount(),
        amount in valid_amount(),
    ) {
        let account = make_account(account_type, AccountStatus::Active, balance);
        let result = validate_withdraw(&account, amount);
        if amount > balance {
            prop_assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// A loan account is exempt from I2: withdrawing more than the current
    /// balance is always accepted (the balance may go negative).
    #[test]
    fn prop_loan_account_withdraw_may_go_negative(
        balance in valid_amount(),
        amount in valid_amount(),
    ) {
        let account = make_account(AccountType::Loan, AccountStatus::Active, balance);
        prop_assert!(validate_withdraw(&account, amount).is_ok());
    }

    /// I4: a frozen or closed account rejects every mutating operation.
    #[test]
    fn prop_inactive_account_rejects_deposit_and_withdraw(
        account_type in non_loan_account_type(),
        balance in valid_amount(),
        amount in valid_amount(),
    ) {
        for status in [AccountStatus::Frozen, AccountStatus::Closed] {
            let account = make_account(account_type, status, balance);
            prop_assert!(matches!(
                validate_deposit(&account, amount),
                Err(LedgerError::AccountNotActive(_))
            ));
            prop_assert!(matches!(
                validate_withdraw(&account, amount),
                Err(LedgerError::AccountNotActive(_))
            ));
        }
    }

    /// A transfer between two accounts holding different currencies is
    /// always rejected, independent of amount or balance.
    #[test]
    fn prop_transfer_currency_mismatch_always_rejected(
        account_type in non_loan_account_type(),
        balance in valid_amount(),
        amount in valid_amount(),
    ) {
        let sender = make_account(account_type, AccountStatus::Active, balance);
        let mut receiver = make_account(account_type, AccountStatus::Active, balance);
        receiver.currency = "EUR".to_string();
        prop_assert!(matches!(
            validate_transfer(&sender, &receiver, amount),
            Err(LedgerError::CurrencyMismatch { .. })
        ));
    }

    /// The one-account-per-user policy rejects a second open account for
    /// any user that already has one, and never rejects the first.
    #[test]
    fn prop_one_account_per_user_enforced(open_account_count in 0u32..10) {
        let user_id = UserId::new();
        let result = validate_create_account(user_id, true, open_account_count, true);
        if open_account_count > 0 {
            prop_assert!(matches!(result, Err(LedgerError::AccountLimitReached(_))));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// When the one-account-per-user policy is disabled, any open account
    /// count is accepted for an active user.
    #[test]
    fn prop_one_account_per_user_disabled_never_limits(open_account_count in 0u32..10) {
        let user_id = UserId::new();
        prop_assert!(validate_create_account(user_id, true, open_account_count, false).is_ok());
    }
}
