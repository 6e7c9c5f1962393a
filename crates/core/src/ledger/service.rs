//! `LedgerService`: validates and resolves ledger operations into posting
//! plans without touching a database. Mirrors the teacher's
//! `validate_and_resolve` split — the repository supplies locked account
//! state, this service returns the entries to write or rejects the call.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::EntryType;
use super::validation::{self, AccountInfo};
use ledger_shared::types::AccountId;

/// A single resolved posting: the account to write, the signed amount to
/// apply, and the entry type derived from that sign.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    /// The account this entry posts to.
    pub account_id: AccountId,
    /// Signed amount to add to the account's balance.
    pub amount: Decimal,
    /// Derived debit/credit classification.
    pub entry_type: EntryType,
}

impl ResolvedEntry {
    fn new(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount,
            entry_type: EntryType::from_amount(amount),
        }
    }
}

/// The two legs of a validated transfer, ready to post under lock.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    /// The debit leg against the sender.
    pub sender_entry: ResolvedEntry,
    /// The credit leg against the receiver.
    pub receiver_entry: ResolvedEntry,
}

impl TransferPlan {
    /// Returns the algebraic sum of the plan's entries; must be zero for a
    /// transfer to satisfy I1.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.sender_entry.amount + self.receiver_entry.amount
    }
}

/// Stateless planner for the three balance-mutating ledger operations.
pub struct LedgerService;

impl LedgerService {
    /// Validates and plans a `Transfer`.
    ///
    /// # Errors
    ///
    /// Propagates any `LedgerError` from [`validation::validate_transfer`].
    pub fn plan_transfer(
        sender: &AccountInfo,
        receiver: &AccountInfo,
        amount: Decimal,
    ) -> Result<TransferPlan, LedgerError> {
        validation::validate_transfer(sender, receiver, amount)?;

        let plan = TransferPlan {
            sender_entry: ResolvedEntry::new(sender.id, -amount),
            receiver_entry: ResolvedEntry::new(receiver.id, amount),
        };

        debug_assert!(plan.total() == Decimal::ZERO, "transfer plan must balance");
        Ok(plan)
    }

    /// Validates and plans a `Deposit`.
    ///
    /// # Errors
    ///
    /// Propagates any `LedgerError` from [`validation::validate_deposit`].
    pub fn plan_deposit(
        account: &AccountInfo,
        amount: Decimal,
    ) -> Result<ResolvedEntry, LedgerError> {
        validation::validate_deposit(account, amount)?;
        Ok(ResolvedEntry::new(account.id, amount))
    }

    /// Validates and plans a `Withdraw`.
    ///
    /// # Errors
    ///
    /// Propagates any `LedgerError` from [`validation::validate_withdraw`].
    pub fn plan_withdraw(
        account: &AccountInfo,
        amount: Decimal,
    ) -> Result<ResolvedEntry, LedgerError> {
        validation::validate_withdraw(account, amount)?;
        Ok(ResolvedEntry::new(account.id, -amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{AccountStatus, AccountType};
    use ledger_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn make_account(balance: Decimal, account_type: AccountType) -> AccountInfo {
        AccountInfo {
            id: AccountId::new(),
            user_id: UserId::new(),
            account_type,
            currency: "USD".to_string(),
            status: AccountStatus::Active,
            current_balance: balance,
        }
    }

    #[test]
    fn test_plan_transfer_balances_to_zero() {
        let sender = make_account(dec!(1000), AccountType::Checking);
        let receiver = make_account(dec!(500), AccountType::Checking);
        let plan = LedgerService::plan_transfer(&sender, &receiver, dec!(200)).unwrap();

        assert_eq!(plan.total(), Decimal::ZERO);
        assert_eq!(plan.sender_entry.amount, dec!(-200));
        assert_eq!(plan.receiver_entry.amount, dec!(200));
        assert_eq!(plan.sender_entry.entry_type, EntryType::Debit);
        assert_eq!(plan.receiver_entry.entry_type, EntryType::Credit);
    }

    #[test]
    fn test_plan_transfer_rejects_insufficient_funds() {
        let sender = make_account(dec!(100), AccountType::Checking);
        let receiver = make_account(dec!(0), AccountType::Checking);
        assert!(matches!(
            LedgerService::plan_transfer(&sender, &receiver, dec!(200)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_plan_deposit_credits() {
        let account = make_account(dec!(0), AccountType::Savings);
        let entry = LedgerService::plan_deposit(&account, dec!(1000)).unwrap();
        assert_eq!(entry.amount, dec!(1000));
        assert_eq!(entry.entry_type, EntryType::Credit);
    }

    #[test]
    fn test_plan_withdraw_debits() {
        let account = make_account(dec!(700), AccountType::Checking);
        let entry = LedgerService::plan_withdraw(&account, dec!(700)).unwrap();
        assert_eq!(entry.amount, dec!(-700));
        assert_eq!(entry.entry_type, EntryType::Debit);
    }

    #[test]
    fn test_deposit_then_withdraw_round_trip_preserves_balance() {
        let account = make_account(dec!(0), AccountType::Checking);
        let deposit = LedgerService::plan_deposit(&account, dec!(500)).unwrap();
        let withdraw = LedgerService::plan_withdraw(&account, dec!(500)).unwrap();
        assert_eq!(deposit.amount + withdraw.amount, Decimal::ZERO);
    }
}
