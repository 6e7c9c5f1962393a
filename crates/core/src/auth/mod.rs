//! Authentication principals and password hashing.
//!
//! The ledger has two distinct authentication principals: a customer-facing
//! `User` and a back-office `Employee`. They are never interchangeable —
//! an employee cannot hold a customer role and vice versa.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Role of a customer-facing user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Ordinary account holder.
    Customer,
    /// System administrator (distinct from an `Employee`).
    Admin,
    /// Read-only auditor.
    Auditor,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
            Self::Auditor => write!(f, "auditor"),
        }
    }
}

/// KYC (Know Your Customer) verification status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    /// Verification not yet completed.
    Pending,
    /// Identity verified by an employee.
    Verified,
    /// Verification rejected by an employee.
    Rejected,
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Department of a back-office employee principal.
///
/// Distinct from `UserRole`: an employee is never a customer, and admin
/// operations always require an `Employee`, never a `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeDepartment {
    /// Full administrative privileges.
    Admin,
    /// Day-to-day account operations (freeze, close, KYC).
    Operations,
    /// Customer support, read-mostly.
    Support,
    /// Read-only access to audit logs and reports.
    Audit,
}

impl EmployeeDepartment {
    /// Returns true if this department may perform mutating admin
    /// operations (KYC changes, freeze/close, account creation).
    #[must_use]
    pub const fn can_mutate(&self) -> bool {
        matches!(self, Self::Admin | Self::Operations)
    }
}

impl std::fmt::Display for EmployeeDepartment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Operations => write!(f, "operations"),
            Self::Support => write!(f, "support"),
            Self::Audit => write!(f, "audit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Customer.to_string(), "customer");
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Auditor.to_string(), "auditor");
    }

    #[test]
    fn test_employee_department_can_mutate() {
        assert!(EmployeeDepartment::Admin.can_mutate());
        assert!(EmployeeDepartment::Operations.can_mutate());
        assert!(!EmployeeDepartment::Support.can_mutate());
        assert!(!EmployeeDepartment::Audit.can_mutate());
    }

    #[test]
    fn test_kyc_status_display() {
        assert_eq!(KycStatus::Pending.to_string(), "pending");
        assert_eq!(KycStatus::Verified.to_string(), "verified");
        assert_eq!(KycStatus::Rejected.to_string(), "rejected");
    }
}
