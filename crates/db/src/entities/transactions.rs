//! `SeaORM` Entity for the transactions table. A transaction header is
//! the unit of atomicity: once `status` reaches a terminal value it is
//! never mutated again except by a compensating reversal (spec.md §3
//! I6, I7).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub reference_id: Uuid,
    pub type_id: Uuid,
    pub description: Option<String>,
    pub initiated_by_user_id: Option<Uuid>,
    pub reversed_transaction_id: Option<Uuid>,
    pub status: TransactionStatus,
    pub created_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transaction_types::Entity",
        from = "Column::TypeId",
        to = "super::transaction_types::Column::Id"
    )]
    TransactionTypes,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::InitiatedByUserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::transaction_entries::Entity")]
    TransactionEntries,
    #[sea_orm(has_one = "super::risk_scores::Entity")]
    RiskScores,
}

impl Related<super::transaction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionTypes.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::transaction_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionEntries.def()
    }
}

impl Related<super::risk_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RiskScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
