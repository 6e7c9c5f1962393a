//! Postgres enum types, mirrored by `CREATE TYPE ... AS ENUM` statements
//! in the migration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `users.kyc_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "kyc_status")]
pub enum KycStatus {
    /// Not yet verified.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Verified by an employee.
    #[sea_orm(string_value = "verified")]
    Verified,
    /// Rejected by an employee.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Ordinary account holder.
    #[sea_orm(string_value = "customer")]
    Customer,
    /// System administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Read-only auditor.
    #[sea_orm(string_value = "auditor")]
    Auditor,
}

/// `employees.department`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "employee_department")]
pub enum EmployeeDepartment {
    /// Full administrative privileges.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Day-to-day account operations.
    #[sea_orm(string_value = "operations")]
    Operations,
    /// Customer support.
    #[sea_orm(string_value = "support")]
    Support,
    /// Read-only audit access.
    #[sea_orm(string_value = "audit")]
    Audit,
}

/// `accounts.account_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Interest-bearing savings account.
    #[sea_orm(string_value = "savings")]
    Savings,
    /// Everyday transactional account.
    #[sea_orm(string_value = "checking")]
    Checking,
    /// Stored-value wallet account.
    #[sea_orm(string_value = "wallet")]
    Wallet,
    /// Loan account; balance may be negative.
    #[sea_orm(string_value = "loan")]
    Loan,
}

/// `accounts.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
pub enum AccountStatus {
    /// Normal operating status.
    #[sea_orm(string_value = "active")]
    Active,
    /// Rejects all mutations; reversible.
    #[sea_orm(string_value = "frozen")]
    Frozen,
    /// Terminal.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// `transaction_types.type_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type_code")]
pub enum TransactionTypeCode {
    /// Credit with no counterparty leg.
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
    /// Debit with no counterparty leg.
    #[sea_orm(string_value = "WITHDRAWAL")]
    Withdrawal,
    /// Paired debit/credit between two accounts.
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
    /// Outbound payment.
    #[sea_orm(string_value = "PAYMENT")]
    Payment,
    /// System-generated interest credit.
    #[sea_orm(string_value = "INTEREST")]
    Interest,
    /// System-generated fee debit.
    #[sea_orm(string_value = "FEE")]
    Fee,
}

/// `transactions.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    /// Awaiting commit.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Committed successfully; immutable.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Rolled back; immutable.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Superseded by a reversal; immutable.
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

/// `audit_logs.entity_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "audit_entity_type")]
pub enum AuditEntityType {
    /// The audited row is a `users` row.
    #[sea_orm(string_value = "USER")]
    User,
    /// The audited row is an `accounts` row.
    #[sea_orm(string_value = "ACCOUNT")]
    Account,
    /// The audited row is a `transactions` row.
    #[sea_orm(string_value = "TRANSACTION")]
    Transaction,
}

/// `risk_scores.verdict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "risk_verdict")]
pub enum RiskVerdict {
    /// Scored as benign.
    #[sea_orm(string_value = "SAFE")]
    Safe,
    /// Scored as worth a closer look.
    #[sea_orm(string_value = "SUSPICIOUS")]
    Suspicious,
    /// Scored as requiring immediate attention.
    #[sea_orm(string_value = "CRITICAL")]
    Critical,
}
