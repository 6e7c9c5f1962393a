//! Admin repository: the operations available to an authenticated
//! Employee principal.
//!
//! Every mutation here delegates to the same [`AccountRepository`] /
//! [`UserRepository`] paths a customer-facing caller would use — the
//! business rules do not change for an admin caller — then writes one
//! additional audit row naming the employee principal, satisfying the
//! admin-specific audit contract on top of the `CREATE`/`STATUS_CHANGE`
//! rows those repositories already write for the affected user/account.

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde_json::json;
use uuid::Uuid;

use super::account::{AccountError, AccountRepository};
use super::user::UserError;
use super::UserRepository;
use crate::entities::{
    accounts, audit_logs,
    sea_orm_active_enums::{AccountType, AuditEntityType, KycStatus, TransactionStatus, TransactionTypeCode},
    transactions, users,
};

/// Errors surfaced by admin operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The underlying account operation failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// The underlying user operation failed.
    #[error(transparent)]
    User(#[from] UserError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Filters for [`AdminRepository::list_transactions`].
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to one status.
    pub status: Option<TransactionStatus>,
    /// Restrict to one operation kind.
    pub type_code: Option<TransactionTypeCode>,
}

/// Admin repository for employee-privileged operations.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    db: DatabaseConnection,
    accounts: AccountRepository,
    users: UserRepository,
}

impl AdminRepository {
    /// Creates a new admin repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, account_number_max_retries: u32, default_currency: String) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone(), account_number_max_retries, default_currency),
            users: UserRepository::new(db.clone()),
            db,
        }
    }

    /// Sets a user's KYC status as an employee action.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub async fn set_kyc_status(
        &self,
        employee_id: Uuid,
        user_id: Uuid,
        status: KycStatus,
    ) -> Result<users::Model, AdminError> {
        let updated = self.users.set_kyc_status(user_id, status).await?;
        self.record_employee_action(
            employee_id,
            AuditEntityType::User,
            updated.id,
            "ADMIN_SET_KYC_STATUS",
            json!({"kyc_status": updated.kyc_status}),
        )
        .await?;
        Ok(updated)
    }

    /// Activates or deactivates a user as an employee action.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub async fn set_user_active(
        &self,
        employee_id: Uuid,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<users::Model, AdminError> {
        let updated = self.users.set_active(user_id, is_active).await?;
        self.record_employee_action(
            employee_id,
            AuditEntityType::User,
            updated.id,
            "ADMIN_SET_USER_ACTIVE",
            json!({"is_active": updated.is_active}),
        )
        .await?;
        Ok(updated)
    }

    /// Opens a new account on behalf of a user.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as
    /// [`AccountRepository::create_account`].
    pub async fn create_account_for_user(
        &self,
        employee_id: Uuid,
        user_id: Uuid,
        account_type: AccountType,
        currency: String,
        one_account_per_user: bool,
    ) -> Result<accounts::Model, AdminError> {
        let account = self
            .accounts
            .create_account(user_id, account_type, currency, one_account_per_user)
            .await?;
        self.record_employee_action(
            employee_id,
            AuditEntityType::Account,
            account.id,
            "ADMIN_CREATE_ACCOUNT",
            json!({"account_number": account.account_number}),
        )
        .await?;
        Ok(account)
    }

    /// Toggles an account between active and frozen.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as
    /// [`AccountRepository::toggle_freeze`].
    pub async fn toggle_freeze(
        &self,
        employee_id: Uuid,
        account_id: Uuid,
    ) -> Result<accounts::Model, AdminError> {
        let updated = self.accounts.toggle_freeze(account_id).await?;
        self.record_employee_action(
            employee_id,
            AuditEntityType::Account,
            updated.id,
            "ADMIN_TOGGLE_FREEZE",
            json!({"status": updated.status}),
        )
        .await?;
        Ok(updated)
    }

    /// Closes an account.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as
    /// [`AccountRepository::close_account`].
    pub async fn close_account(
        &self,
        employee_id: Uuid,
        account_id: Uuid,
    ) -> Result<accounts::Model, AdminError> {
        let updated = self.accounts.close_account(account_id).await?;
        self.record_employee_action(
            employee_id,
            AuditEntityType::Account,
            updated.id,
            "ADMIN_CLOSE_ACCOUNT",
            json!({"status": updated.status}),
        )
        .await?;
        Ok(updated)
    }

    /// Lists users, optionally filtered by role, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_users(
        &self,
        role: Option<crate::entities::sea_orm_active_enums::UserRole>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<users::Model>, DbErr> {
        self.users.list(role, offset, limit).await
    }

    /// Lists a user's accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts_for_user(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, DbErr> {
        self.accounts.list_for_user(user_id).await
    }

    /// Lists transactions, optionally filtered, newest first, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query = transactions::Entity::find().order_by_desc(transactions::Column::CreatedAt);
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(type_code) = filter.type_code {
            let type_row = crate::entities::transaction_types::Entity::find()
                .filter(crate::entities::transaction_types::Column::TypeCode.eq(type_code))
                .one(&self.db)
                .await?;
            if let Some(type_row) = type_row {
                query = query.filter(transactions::Column::TypeId.eq(type_row.id));
            } else {
                return Ok(Vec::new());
            }
        }
        query.offset(offset).limit(limit).all(&self.db).await
    }

    async fn record_employee_action(
        &self,
        employee_id: Uuid,
        entity_type: AuditEntityType,
        entity_id: Uuid,
        action: &str,
        new_value: serde_json::Value,
    ) -> Result<(), DbErr> {
        let log = audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(entity_type),
            entity_id: Set(entity_id),
            action: Set(action.to_string()),
            old_value: Set(None),
            new_value: Set(Some(new_value)),
            performed_by_user_id: Set(None),
            performed_by_employee_id: Set(Some(employee_id)),
            ip_address: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };
        log.insert(&self.db).await?;
        Ok(())
    }
}
