//! Account repository: account lifecycle operations (`CreateAccount`,
//! `FreezeAccount`, `CloseAccount`) plus read access to account rows.
//!
//! Every mutation locks the account row (and, for account creation, the
//! owning user's open-account count) with `SELECT ... FOR UPDATE` before
//! handing the locked state to [`ledger_core::ledger`]'s pure validators,
//! mirroring the teacher's lock-then-validate-then-write shape in
//! `transaction.rs` but adding the row lock the teacher's accounting
//! domain never needed at account-creation granularity.

use ledger_core::ledger::{self, AccountInfo, AccountStatus as CoreAccountStatus, AccountType as CoreAccountType};
use ledger_shared::types::{AccountId, UserId};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{
    accounts, audit_logs,
    sea_orm_active_enums::{AccountStatus, AccountType, AuditEntityType},
    users,
};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The underlying business rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] ledger_core::ledger::LedgerError),

    /// The owning user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    /// Account not found.
    #[error("account not found: {0}")]
    AccountNotFound(Uuid),

    /// Could not mint a unique account number after several attempts.
    #[error("exhausted {0} attempts generating a unique account number")]
    AccountNumberExhausted(u32),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

fn to_core_account_type(t: AccountType) -> CoreAccountType {
    match t {
        AccountType::Savings => CoreAccountType::Savings,
        AccountType::Checking => CoreAccountType::Checking,
        AccountType::Wallet => CoreAccountType::Wallet,
        AccountType::Loan => CoreAccountType::Loan,
    }
}

fn from_core_account_type(t: CoreAccountType) -> AccountType {
    match t {
        CoreAccountType::Savings => AccountType::Savings,
        CoreAccountType::Checking => AccountType::Checking,
        CoreAccountType::Wallet => AccountType::Wallet,
        CoreAccountType::Loan => AccountType::Loan,
    }
}

fn to_core_account_status(s: AccountStatus) -> CoreAccountStatus {
    match s {
        AccountStatus::Active => CoreAccountStatus::Active,
        AccountStatus::Frozen => CoreAccountStatus::Frozen,
        AccountStatus::Closed => CoreAccountStatus::Closed,
    }
}

fn from_core_account_status(s: CoreAccountStatus) -> AccountStatus {
    match s {
        CoreAccountStatus::Active => AccountStatus::Active,
        CoreAccountStatus::Frozen => AccountStatus::Frozen,
        CoreAccountStatus::Closed => AccountStatus::Closed,
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

/// Account repository for lifecycle operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    account_number_max_retries: u32,
    default_currency: String,
}

impl AccountRepository {
    /// Creates a new account repository. `default_currency` is applied
    /// whenever a caller opens an account without naming a currency
    /// (spec.md: "currency defaults to USD if empty").
    #[must_use]
    pub fn new(db: DatabaseConnection, account_number_max_retries: u32, default_currency: String) -> Self {
        Self {
            db,
            account_number_max_retries,
            default_currency,
        }
    }

    /// Opens a new account for `user_id`.
    ///
    /// Locks the user row and counts the user's currently non-closed
    /// accounts under that lock before consulting
    /// [`ledger::validation::validate_create_account`], so two concurrent
    /// `CreateAccount` calls for the same user cannot both observe zero
    /// open accounts when `one_account_per_user` is enforced.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, a `Ledger` error if the business rule
    /// rejects the call, `AccountNumberExhausted` if a unique account
    /// number could not be minted, or a `Database` error.
    pub async fn create_account(
        &self,
        user_id: Uuid,
        account_type: AccountType,
        currency: String,
        one_account_per_user: bool,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AccountError::UserNotFound(user_id))?;

        let open_count = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::Status.ne(AccountStatus::Closed))
            .count(&txn)
            .await?;

        ledger::validation::validate_create_account(
            UserId::from_uuid(user.id),
            user.is_active,
            u32::try_from(open_count).unwrap_or(u32::MAX),
            one_account_per_user,
        )?;

        let account_number = self.mint_account_number(&txn).await?;
        let currency = if currency.trim().is_empty() {
            self.default_currency.clone()
        } else {
            currency
        };
        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_number: Set(account_number),
            account_type: Set(account_type),
            currency: Set(currency),
            current_balance: Set(Decimal::ZERO),
            status: Set(AccountStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let account = account.insert(&txn).await?;

        record_audit(
            &txn,
            account.id,
            "CREATE",
            None,
            Some(json!({
                "account_number": account.account_number,
                "account_type": account.account_type,
                "currency": account.currency,
            })),
            Some(user_id),
        )
        .await?;

        txn.commit().await?;
        Ok(account)
    }

    /// Toggles an account between active and frozen.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, a `Ledger` error if the account is
    /// already closed, or a `Database` error.
    pub async fn toggle_freeze(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let account = accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AccountError::AccountNotFound(account_id))?;

        let info = to_account_info(&account);
        let new_status = ledger::validation::validate_freeze(&info)?;
        let old_status = account.status;

        let mut active: accounts::ActiveModel = account.into();
        active.status = Set(from_core_account_status(new_status));
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        record_audit(
            &txn,
            updated.id,
            "STATUS_CHANGE",
            Some(json!({"status": old_status})),
            Some(json!({"status": updated.status})),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Closes an account. The balance must be zero.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, a `Ledger` error if the account is
    /// already closed or has a non-zero balance, or a `Database` error.
    pub async fn close_account(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let account = accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AccountError::AccountNotFound(account_id))?;

        let info = to_account_info(&account);
        ledger::validation::validate_close(&info)?;
        let old_status = account.status;

        let mut active: accounts::ActiveModel = account.into();
        active.status = Set(AccountStatus::Closed);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        record_audit(
            &txn,
            updated.id,
            "STATUS_CHANGE",
            Some(json!({"status": old_status})),
            Some(json!({"status": updated.status})),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Finds an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, account_id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(account_id).one(&self.db).await
    }

    /// Lists a user's accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, DbErr> {
        use sea_orm::QueryOrder;
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_desc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Mints a random account number, retrying on collision up to the
    /// configured limit (spec.md's deployment-time
    /// `account_number_max_retries`).
    async fn mint_account_number(
        &self,
        txn: &sea_orm::DatabaseTransaction,
    ) -> Result<String, AccountError> {
        for _ in 0..self.account_number_max_retries {
            let candidate = generate_account_number();
            let exists = accounts::Entity::find()
                .filter(accounts::Column::AccountNumber.eq(&candidate))
                .count(txn)
                .await?;
            if exists == 0 {
                return Ok(candidate);
            }
        }
        Err(AccountError::AccountNumberExhausted(
            self.account_number_max_retries,
        ))
    }
}

/// Writes an append-only audit row within `txn`, per the account-creation
/// and status-change contract of the Audit Recorder.
async fn record_audit(
    txn: &DatabaseTransaction,
    account_id: Uuid,
    action: &str,
    old_value: Option<serde_json::Value>,
    new_value: Option<serde_json::Value>,
    performed_by_user_id: Option<Uuid>,
) -> Result<(), DbErr> {
    let log = audit_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        entity_type: Set(AuditEntityType::Account),
        entity_id: Set(account_id),
        action: Set(action.to_string()),
        old_value: Set(old_value),
        new_value: Set(new_value),
        performed_by_user_id: Set(performed_by_user_id),
        performed_by_employee_id: Set(None),
        ip_address: Set(None),
        created_at: Set(chrono::Utc::now().into()),
    };
    log.insert(txn).await?;
    Ok(())
}

/// Generates a 12-digit numeric account number.
fn generate_account_number() -> String {
    let mut rng = rand::rng();
    (0..12)
        .map(|_| char::from_digit(rng.random_range(0..10), 10).unwrap_or('0'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_account_number_is_twelve_digits() {
        let number = generate_account_number();
        assert_eq!(number.len(), 12);
        assert!(number.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_account_type_round_trips_through_core_and_back() {
        for t in [
            AccountType::Savings,
            AccountType::Checking,
            AccountType::Wallet,
            AccountType::Loan,
        ] {
            assert_eq!(from_core_account_type(to_core_account_type(t)), t);
        }
    }

    #[test]
    fn test_account_status_round_trips_through_core_and_back() {
        for s in [
            AccountStatus::Active,
            AccountStatus::Frozen,
            AccountStatus::Closed,
        ] {
            assert_eq!(from_core_account_status(to_core_account_status(s)), s);
        }
    }
}
