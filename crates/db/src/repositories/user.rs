//! User repository for customer-facing principal database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{
    audit_logs,
    sea_orm_active_enums::{AuditEntityType, KycStatus, UserRole},
    users,
};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Username already registered.
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Email already registered.
    #[error("email '{0}' is already registered")]
    DuplicateEmail(String),

    /// User not found.
    #[error("user not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a new user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Chosen username.
    pub username: String,
    /// Pre-hashed password (never hashed inside the repository).
    pub password_hash: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Full legal name.
    pub full_name: String,
    /// Role granted at registration (almost always `Customer`).
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new user after checking username/email uniqueness.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email is already taken, or the
    /// database insert fails.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        if self.username_exists(&input.username).await? {
            return Err(UserError::DuplicateUsername(input.username));
        }
        if self.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(input.username),
            password_hash: Set(input.password_hash),
            email: Set(input.email),
            phone: Set(input.phone),
            full_name: Set(input.full_name),
            kyc_status: Set(KycStatus::Pending),
            role: Set(input.role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = self.db.begin().await?;
        let user = user.insert(&txn).await?;
        record_audit(
            &txn,
            user.id,
            "CREATE",
            None,
            Some(json!({
                "username": user.username,
                "email": user.email,
                "role": user.role,
            })),
        )
        .await?;
        txn.commit().await?;
        Ok(user)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by username, for login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Lists users, optionally filtered by role, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        role: Option<UserRole>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<users::Model>, DbErr> {
        let mut query = users::Entity::find().order_by_desc(users::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(role));
        }
        query.offset(offset).limit(limit).all(&self.db).await
    }

    /// Updates KYC status for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub async fn set_kyc_status(
        &self,
        id: Uuid,
        status: KycStatus,
    ) -> Result<users::Model, UserError> {
        let txn = self.db.begin().await?;
        let user = users::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(UserError::NotFound(id))?;
        let old_status = user.kyc_status;

        let mut active: users::ActiveModel = user.into();
        active.kyc_status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        record_audit(
            &txn,
            updated.id,
            "STATUS_CHANGE",
            Some(json!({"kyc_status": old_status})),
            Some(json!({"kyc_status": updated.kyc_status})),
        )
        .await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Activates or deactivates a user's login.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<users::Model, UserError> {
        let txn = self.db.begin().await?;
        let user = users::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(UserError::NotFound(id))?;
        let was_active = user.is_active;

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        record_audit(
            &txn,
            updated.id,
            "STATUS_CHANGE",
            Some(json!({"is_active": was_active})),
            Some(json!({"is_active": updated.is_active})),
        )
        .await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Checks whether a username is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Checks whether an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

/// Writes an append-only audit row within `txn`, per the user-creation and
/// status-change contract of the Audit Recorder.
async fn record_audit(
    txn: &sea_orm::DatabaseTransaction,
    user_id: Uuid,
    action: &str,
    old_value: Option<serde_json::Value>,
    new_value: Option<serde_json::Value>,
) -> Result<(), DbErr> {
    let log = audit_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        entity_type: Set(AuditEntityType::User),
        entity_id: Set(user_id),
        action: Set(action.to_string()),
        old_value: Set(old_value),
        new_value: Set(new_value),
        performed_by_user_id: Set(Some(user_id)),
        performed_by_employee_id: Set(None),
        ip_address: Set(None),
        created_at: Set(chrono::Utc::now().into()),
    };
    log.insert(txn).await?;
    Ok(())
}
