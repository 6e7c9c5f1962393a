//! `SeaORM` entities mirroring the schema applied by [`crate::migration`].

pub mod accounts;
pub mod audit_logs;
pub mod employees;
pub mod risk_scores;
pub mod sea_orm_active_enums;
pub mod transaction_entries;
pub mod transaction_types;
pub mod transactions;
pub mod users;

pub use accounts::Entity as Accounts;
pub use audit_logs::Entity as AuditLogs;
pub use employees::Entity as Employees;
pub use risk_scores::Entity as RiskScores;
pub use transaction_entries::Entity as TransactionEntries;
pub use transaction_types::Entity as TransactionTypes;
pub use transactions::Entity as Transactions;
pub use users::Entity as Users;
