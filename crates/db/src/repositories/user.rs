//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email already registered.
    #[error("Email already registered")]
    DuplicateEmail,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
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

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Creates a new user. The caller hashes the password.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateEmail` when the email is taken.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
        institution_id: Option<Uuid>,
    ) -> Result<users::Model, UserError> {
        if self.email_exists(email).await? {
            return Err(UserError::DuplicateEmail);
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(full_name.to_string()),
            role: Set(role),
            institution_id: Set(institution_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, UserError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
