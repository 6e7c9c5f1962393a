//! Employee repository for back-office principal database operations.

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::{employees, sea_orm_active_enums::EmployeeDepartment};

/// Error types for employee operations.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    /// Email already registered.
    #[error("email '{0}' is already registered")]
    DuplicateEmail(String),

    /// Employee not found.
    #[error("employee not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Employee repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Onboards a new employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the insert
    /// fails.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        department: EmployeeDepartment,
    ) -> Result<employees::Model, EmployeeError> {
        let existing = employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(EmployeeError::DuplicateEmail(email.to_string()));
        }

        let now = chrono::Utc::now().into();
        let employee = employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(full_name.to_string()),
            department: Set(department),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(employee.insert(&self.db).await?)
    }

    /// Finds an employee by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an employee by email, for login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .one(&self.db)
            .await
    }
}
