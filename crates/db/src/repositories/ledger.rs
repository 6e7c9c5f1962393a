//! Ledger repository: the impure half of the double-entry engine.
//!
//! [`ledger_core::ledger`] validates and resolves an operation into signed
//! entries without touching a database; this repository supplies the
//! locked account state, writes the entries and header row, and updates
//! denormalized balances, all inside one `DatabaseTransaction`. Grounded
//! on the teacher's `db.begin()` / per-entry-insert / `txn.commit()` shape
//! in `transaction.rs`, with two additions the teacher's single-ledger
//! domain never needed: canonical lock ordering across two accounts, and
//! an idempotency check keyed on `reference_id` before any row is
//! touched.

use chrono::Utc;
use ledger_core::ledger::{self, AccountInfo, LedgerService, ResolvedEntry};
use ledger_core::workflow::{OriginalEntry, ReversalError, ReversalInput, ReversalService};
use ledger_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    accounts, transaction_entries, transaction_types, transactions,
    sea_orm_active_enums::{
        AccountStatus as DbAccountStatus, AccountType as DbAccountType,
        TransactionStatus as DbTransactionStatus, TransactionTypeCode,
    },
};

/// Errors that can occur while posting a ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerRepositoryError {
    /// The underlying business rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] ledger_core::ledger::LedgerError),

    /// Referenced account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(Uuid),

    /// The `transaction_types` reference row for this operation is
    /// missing; the seed migration was not applied.
    #[error("transaction type {0:?} is not seeded")]
    TransactionTypeNotSeeded(TransactionTypeCode),

    /// The transaction to be reversed does not exist.
    #[error("transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Reversal construction rejected the request (not completed, already
    /// reversed, or the original's entries were never balanced).
    #[error(transparent)]
    Reversal(#[from] ReversalError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// The posted result of a ledger operation: the transaction header and
/// the entries written against it, in insertion order.
#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    /// The transaction header row.
    pub transaction: transactions::Model,
    /// The entries posted under this transaction.
    pub entries: Vec<transaction_entries::Model>,
}

fn to_core_account_type(t: DbAccountType) -> ledger::AccountType {
    match t {
        DbAccountType::Savings => ledger::AccountType::Savings,
        DbAccountType::Checking => ledger::AccountType::Checking,
        DbAccountType::Wallet => ledger::AccountType::Wallet,
        DbAccountType::Loan => ledger::AccountType::Loan,
    }
}

fn to_core_account_status(s: DbAccountStatus) -> ledger::AccountStatus {
    match s {
        DbAccountStatus::Active => ledger::AccountStatus::Active,
        DbAccountStatus::Frozen => ledger::AccountStatus::Frozen,
        DbAccountStatus::Closed => ledger::AccountStatus::Closed,
    }
}

fn to_account_info(model: &accounts::Model) -> AccountInfo {
    AccountInfo {
        id: AccountId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        account_type: to_core_account_type(model.account_type),
        currency: model.currency.clone(),
        status: to_core_account_status(model.status),
        current_balance: model.current_balance,
    }
}

/// Ledger repository: posts `Transfer`, `Deposit`, and `Withdraw`
/// operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a transfer between two distinct accounts.
    ///
    /// Both account rows are locked in ascending `id` order before either
    /// is read, so two concurrent transfers that share an account can
    /// never deadlock waiting on each other's locks.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if either account is missing, a `Ledger`
    /// error if the business rule rejects the transfer (including a
    /// reused `reference_id`), or a `Database` error.
    pub async fn transfer(
        &self,
        reference_id: Uuid,
        sender_account_id: Uuid,
        receiver_account_id: Uuid,
        amount: Decimal,
        initiated_by_user_id: Option<Uuid>,
        description: Option<String>,
    ) -> Result<TransactionOutcome, LedgerRepositoryError> {
        let txn = self.db.begin().await?;

        if let Some(outcome) = self.check_idempotency(&txn, reference_id).await? {
            txn.rollback().await?;
            return Ok(outcome);
        }

        let (first_id, second_id) = if sender_account_id <= receiver_account_id {
            (sender_account_id, receiver_account_id)
        } else {
            (receiver_account_id, sender_account_id)
        };
        let first = self.lock_account(&txn, first_id).await?;
        let second = self.lock_account(&txn, second_id).await?;

        let sender = if first.id == sender_account_id { &first } else { &second };
        let receiver = if first.id == receiver_account_id { &first } else { &second };

        let plan = LedgerService::plan_transfer(
            &to_account_info(sender),
            &to_account_info(receiver),
            amount,
        )?;

        let transaction = self
            .insert_header(
                &txn,
                reference_id,
                TransactionTypeCode::Transfer,
                description,
                initiated_by_user_id,
            )
            .await?;

        let sender_entry = self
            .apply_entry(&txn, transaction.id, sender, &plan.sender_entry)
            .await?;
        let receiver_entry = self
            .apply_entry(&txn, transaction.id, receiver, &plan.receiver_entry)
            .await?;

        let transaction = self.complete_header(&txn, transaction).await?;

        txn.commit().await?;
        Ok(TransactionOutcome {
            transaction,
            entries: vec![sender_entry, receiver_entry],
        })
    }

    /// Posts a deposit, crediting `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, a `Ledger` error if the business rule
    /// rejects the deposit, or a `Database` error.
    pub async fn deposit(
        &self,
        reference_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        initiated_by_user_id: Option<Uuid>,
        description: Option<String>,
    ) -> Result<TransactionOutcome, LedgerRepositoryError> {
        self.post_single_leg(
            reference_id,
            account_id,
            amount,
            TransactionTypeCode::Deposit,
            initiated_by_user_id,
            description,
            LedgerService::plan_deposit,
        )
        .await
    }

    /// Posts a withdrawal, debiting `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, a `Ledger` error if the business rule
    /// rejects the withdrawal (including insufficient funds), or a
    /// `Database` error.
    pub async fn withdraw(
        &self,
        reference_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        initiated_by_user_id: Option<Uuid>,
        description: Option<String>,
    ) -> Result<TransactionOutcome, LedgerRepositoryError> {
        self.post_single_leg(
            reference_id,
            account_id,
            amount,
            TransactionTypeCode::Withdrawal,
            initiated_by_user_id,
            description,
            LedgerService::plan_withdraw,
        )
        .await
    }

    /// Voids a completed transaction by posting a new one whose entries
    /// negate the original's, without editing the original's rows.
    ///
    /// The original transaction moves `completed` → `reversed`; the
    /// reversing transaction is created `completed` directly, carrying
    /// the same `type_id` as the original and pointing back to it via
    /// `reversed_transaction_id`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if `original_transaction_id` does
    /// not exist, a `Reversal` error if it is not in `completed` status
    /// or has already been reversed, or a `Database` error.
    pub async fn reverse(
        &self,
        original_transaction_id: Uuid,
        reason: String,
        performed_by_user_id: Option<Uuid>,
    ) -> Result<TransactionOutcome, LedgerRepositoryError> {
        let txn = self.db.begin().await?;

        let original = transactions::Entity::find_by_id(original_transaction_id)
            .one(&txn)
            .await?
            .ok_or(LedgerRepositoryError::TransactionNotFound(original_transaction_id))?;

        match original.status {
            DbTransactionStatus::Reversed => {
                return Err(ReversalError::AlreadyReversed(original_transaction_id).into());
            }
            DbTransactionStatus::Completed => {}
            DbTransactionStatus::Pending | DbTransactionStatus::Failed => {
                return Err(ReversalError::NotCompleted(original_transaction_id).into());
            }
        }

        let original_entries = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::TransactionId.eq(original_transaction_id))
            .all(&txn)
            .await?;

        let mut account_ids: Vec<Uuid> = original_entries.iter().map(|e| e.account_id).collect();
        account_ids.sort();
        account_ids.dedup();

        let mut locked_accounts = std::collections::HashMap::with_capacity(account_ids.len());
        for account_id in account_ids {
            locked_accounts.insert(account_id, self.lock_account(&txn, account_id).await?);
        }

        let reversal_input = ReversalInput {
            original_transaction_id,
            original_entries: original_entries
                .iter()
                .map(|e| OriginalEntry {
                    account_id: AccountId::from_uuid(e.account_id),
                    amount: e.amount,
                })
                .collect(),
            reason: reason.clone(),
        };
        let plan = ReversalService::create_reversing_entries(&reversal_input)?;

        let reversing_transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference_id: Set(Uuid::new_v4()),
            type_id: Set(original.type_id),
            description: Set(Some(plan.description.clone())),
            initiated_by_user_id: Set(performed_by_user_id),
            reversed_transaction_id: Set(Some(original_transaction_id)),
            status: Set(DbTransactionStatus::Pending),
            created_at: Set(Utc::now().into()),
            completed_at: Set(None),
        };
        let reversing_transaction = reversing_transaction.insert(&txn).await?;

        let mut entries = Vec::with_capacity(plan.reversing_entries.len());
        for reversing_entry in &plan.reversing_entries {
            let account_id = reversing_entry.account_id.into_inner();
            let account = locked_accounts
                .get(&account_id)
                .ok_or(LedgerRepositoryError::AccountNotFound(account_id))?;
            let resolved = ResolvedEntry {
                account_id: reversing_entry.account_id,
                amount: reversing_entry.amount,
                entry_type: ledger::EntryType::from_amount(reversing_entry.amount),
            };
            entries.push(
                self.apply_entry(&txn, reversing_transaction.id, account, &resolved)
                    .await?,
            );
        }

        let reversing_transaction = self.complete_header(&txn, reversing_transaction).await?;

        let mut original_active: transactions::ActiveModel = original.clone().into();
        original_active.status = Set(DbTransactionStatus::Reversed);
        original_active.update(&txn).await?;

        txn.commit().await?;
        Ok(TransactionOutcome {
            transaction: reversing_transaction,
            entries,
        })
    }

    async fn post_single_leg(
        &self,
        reference_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        type_code: TransactionTypeCode,
        initiated_by_user_id: Option<Uuid>,
        description: Option<String>,
        plan_fn: impl Fn(&AccountInfo, Decimal) -> Result<ResolvedEntry, ledger_core::ledger::LedgerError>,
    ) -> Result<TransactionOutcome, LedgerRepositoryError> {
        let txn = self.db.begin().await?;

        if let Some(outcome) = self.check_idempotency(&txn, reference_id).await? {
            txn.rollback().await?;
            return Ok(outcome);
        }

        let account = self.lock_account(&txn, account_id).await?;
        let resolved = plan_fn(&to_account_info(&account), amount)?;

        let transaction = self
            .insert_header(&txn, reference_id, type_code, description, initiated_by_user_id)
            .await?;
        let entry = self
            .apply_entry(&txn, transaction.id, &account, &resolved)
            .await?;
        let transaction = self.complete_header(&txn, transaction).await?;

        txn.commit().await?;
        Ok(TransactionOutcome {
            transaction,
            entries: vec![entry],
        })
    }

    /// Looks up a prior transaction by `reference_id`. A `Completed` match
    /// is returned as a replayed success; a non-terminal or failed match
    /// is rejected since resuming it silently could double- or under-post.
    async fn check_idempotency(
        &self,
        txn: &DatabaseTransaction,
        reference_id: Uuid,
    ) -> Result<Option<TransactionOutcome>, LedgerRepositoryError> {
        let Some(existing) = transactions::Entity::find()
            .filter(transactions::Column::ReferenceId.eq(reference_id))
            .one(txn)
            .await?
        else {
            return Ok(None);
        };

        if existing.status != DbTransactionStatus::Completed {
            return Err(LedgerRepositoryError::Ledger(
                ledger_core::ledger::LedgerError::DuplicateReference(reference_id),
            ));
        }

        let entries = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::TransactionId.eq(existing.id))
            .all(txn)
            .await?;

        Ok(Some(TransactionOutcome {
            transaction: existing,
            entries,
        }))
    }

    async fn lock_account(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
    ) -> Result<accounts::Model, LedgerRepositoryError> {
        accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(LedgerRepositoryError::AccountNotFound(account_id))
    }

    async fn insert_header(
        &self,
        txn: &DatabaseTransaction,
        reference_id: Uuid,
        type_code: TransactionTypeCode,
        description: Option<String>,
        initiated_by_user_id: Option<Uuid>,
    ) -> Result<transactions::Model, LedgerRepositoryError> {
        let transaction_type = transaction_types::Entity::find()
            .filter(transaction_types::Column::TypeCode.eq(type_code))
            .one(txn)
            .await?
            .ok_or(LedgerRepositoryError::TransactionTypeNotSeeded(type_code))?;

        let header = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference_id: Set(reference_id),
            type_id: Set(transaction_type.id),
            description: Set(description),
            initiated_by_user_id: Set(initiated_by_user_id),
            reversed_transaction_id: Set(None),
            status: Set(DbTransactionStatus::Pending),
            created_at: Set(Utc::now().into()),
            completed_at: Set(None),
        };
        Ok(header.insert(txn).await?)
    }

    async fn apply_entry(
        &self,
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
        account: &accounts::Model,
        resolved: &ResolvedEntry,
    ) -> Result<transaction_entries::Model, LedgerRepositoryError> {
        let new_balance = ledger::balance_after(account.current_balance, resolved.amount);

        let entry = transaction_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_id: Set(transaction_id),
            account_id: Set(account.id),
            amount: Set(resolved.amount),
            balance_after: Set(new_balance),
            created_at: Set(Utc::now().into()),
        };
        let entry = entry.insert(txn).await?;

        let mut active: accounts::ActiveModel = account.clone().into();
        active.current_balance = Set(new_balance);
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;

        Ok(entry)
    }

    async fn complete_header(
        &self,
        txn: &DatabaseTransaction,
        transaction: transactions::Model,
    ) -> Result<transactions::Model, LedgerRepositoryError> {
        let mut active: transactions::ActiveModel = transaction.into();
        active.status = Set(DbTransactionStatus::Completed);
        active.completed_at = Set(Some(Utc::now().into()));
        Ok(active.update(txn).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_order_is_ascending_regardless_of_call_order() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        assert_eq!((first, second), (a, b));

        let (first, second) = if b <= a { (b, a) } else { (a, b) };
        assert_eq!((first, second), (a, b));
    }
}
