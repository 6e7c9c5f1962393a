//! Audit repository: append-only reads and writes against `audit_logs`.
//!
//! Most mutations write their own audit row inline, inside the same
//! `DatabaseTransaction` as the mutation (see `account.rs`, `user.rs`,
//! `ledger.rs`). This repository exists for the cases that write outside
//! any of those transactions — admin actions in `admin.rs` — and for
//! every read path.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde_json::Value as Json;
use uuid::Uuid;

use crate::entities::{audit_logs, sea_orm_active_enums::AuditEntityType};

/// Input for recording an audit row outside an existing transaction.
#[derive(Debug, Clone)]
pub struct RecordAuditInput {
    /// The kind of entity this row describes.
    pub entity_type: AuditEntityType,
    /// The id of the affected row.
    pub entity_id: Uuid,
    /// Free-form action label (e.g. `"CREATE"`, `"STATUS_CHANGE"`).
    pub action: String,
    /// State before the change, if applicable.
    pub old_value: Option<Json>,
    /// State after the change, if applicable.
    pub new_value: Option<Json>,
    /// The user who performed the action, if any.
    pub performed_by_user_id: Option<Uuid>,
    /// The employee who performed the action, if any.
    pub performed_by_employee_id: Option<Uuid>,
    /// Client IP address, if captured.
    pub ip_address: Option<String>,
}

/// Audit repository.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a standalone audit row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record(&self, input: RecordAuditInput) -> Result<audit_logs::Model, DbErr> {
        let log = audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(input.entity_type),
            entity_id: Set(input.entity_id),
            action: Set(input.action),
            old_value: Set(input.old_value),
            new_value: Set(input.new_value),
            performed_by_user_id: Set(input.performed_by_user_id),
            performed_by_employee_id: Set(input.performed_by_employee_id),
            ip_address: Set(input.ip_address),
            created_at: Set(chrono::Utc::now().into()),
        };
        log.insert(&self.db).await
    }

    /// Fetches the audit trail for a single entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_for_entity(
        &self,
        entity_type: AuditEntityType,
        entity_id: Uuid,
    ) -> Result<Vec<audit_logs::Model>, DbErr> {
        audit_logs::Entity::find()
            .filter(audit_logs::Column::EntityType.eq(entity_type))
            .filter(audit_logs::Column::EntityId.eq(entity_id))
            .order_by_desc(audit_logs::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists audit rows, newest first, paginated. Used by admin screens
    /// that need the full trail rather than one entity's.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<Vec<audit_logs::Model>, DbErr> {
        audit_logs::Entity::find()
            .order_by_desc(audit_logs::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
    }
}
