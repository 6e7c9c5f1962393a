//! Repositories implementing the database layer's operations against
//! Postgres via `SeaORM`.

mod account;
mod admin;
mod audit;
mod employee;
mod ledger;
mod report;
mod risk_score;
mod user;

pub use account::{AccountError, AccountRepository};
pub use admin::{AdminError, AdminRepository, TransactionFilter};
pub use audit::{AuditRepository, RecordAuditInput};
pub use employee::{EmployeeError, EmployeeRepository};
pub use ledger::{LedgerRepository, LedgerRepositoryError, TransactionOutcome};
pub use report::{
    BalanceSheetLine, CustomerStatement, FlaggedTransaction, HistoryFilter, IntegrityViolation,
    ReportRepository,
};
pub use risk_score::RiskScoreRepository;
pub use user::{CreateUserInput, UserError, UserRepository};
