//! Risk score repository: read-only access to the advisory fraud-scoring
//! rows written by the anomaly-scoring worker. The engine never writes
//! here and never blocks on these rows being present.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::risk_scores;

/// Risk score repository.
#[derive(Debug, Clone)]
pub struct RiskScoreRepository {
    db: DatabaseConnection,
}

impl RiskScoreRepository {
    /// Creates a new risk score repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the risk score for a transaction, if one has been recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_transaction_id(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<risk_scores::Model>, DbErr> {
        risk_scores::Entity::find()
            .filter(risk_scores::Column::TransactionId.eq(transaction_id))
            .one(&self.db)
            .await
    }
}
