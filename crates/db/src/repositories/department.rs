//! Department repository for database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{departments, institutions, transactions};

/// Error types for department operations.
#[derive(Debug, thiserror::Error)]
pub enum DepartmentError {
    /// Department not found.
    #[error("Department not found: {0}")]
    NotFound(Uuid),

    /// Institution not found.
    #[error("Institution not found: {0}")]
    InstitutionNotFound(Uuid),

    /// Department name already exists for this institution.
    #[error("Department name already exists for this institution")]
    DuplicateName,

    /// Department has dependent transactions and cannot be deleted.
    #[error("Department has {0} transactions and cannot be deleted")]
    HasTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a department.
#[derive(Debug, Clone)]
pub struct CreateDepartmentInput {
    pub institution_id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub head_user_id: Option<Uuid>,
    pub budget_allocated: Decimal,
}

/// Updatable department fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateDepartmentInput {
    pub name: Option<String>,
    pub code: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub head_user_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

/// Department repository for CRUD and allocation writes.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    db: DatabaseConnection,
}

impl DepartmentRepository {
    /// Creates a new department repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new department under an existing institution.
    ///
    /// # Errors
    ///
    /// Returns `DepartmentError::InstitutionNotFound` when the institution
    /// does not exist, `DepartmentError::DuplicateName` on a name collision.
    pub async fn create(
        &self,
        input: CreateDepartmentInput,
    ) -> Result<departments::Model, DepartmentError> {
        let institution_exists = institutions::Entity::find_by_id(input.institution_id)
            .one(&self.db)
            .await?
            .is_some();
        if !institution_exists {
            return Err(DepartmentError::InstitutionNotFound(input.institution_id));
        }

        let name_taken = departments::Entity::find()
            .filter(departments::Column::InstitutionId.eq(input.institution_id))
            .filter(departments::Column::Name.eq(&input.name))
            .count(&self.db)
            .await?
            > 0;
        if name_taken {
            return Err(DepartmentError::DuplicateName);
        }

        let now = Utc::now().into();
        let department = departments::ActiveModel {
            id: Set(Uuid::now_v7()),
            institution_id: Set(input.institution_id),
            name: Set(input.name),
            code: Set(input.code),
            description: Set(input.description),
            head_user_id: Set(input.head_user_id),
            budget_allocated: Set(input.budget_allocated),
            budget_spent: Set(Decimal::ZERO),
            budget_remaining: Set(input.budget_allocated),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(department.insert(&self.db).await?)
    }

    /// Finds a department by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<departments::Model>, DepartmentError> {
        Ok(departments::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists departments of an institution, newest allocation first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_institution(
        &self,
        institution_id: Uuid,
    ) -> Result<Vec<departments::Model>, DepartmentError> {
        Ok(departments::Entity::find()
            .filter(departments::Column::InstitutionId.eq(institution_id))
            .order_by_asc(departments::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Applies a partial update to non-budget fields.
    ///
    /// # Errors
    ///
    /// Returns `DepartmentError::NotFound` when the id does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateDepartmentInput,
    ) -> Result<departments::Model, DepartmentError> {
        let department = self
            .find_by_id(id)
            .await?
            .ok_or(DepartmentError::NotFound(id))?;

        let mut active: departments::ActiveModel = department.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(head) = input.head_user_id {
            active.head_user_id = Set(head);
        }
        if let Some(flag) = input.is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Replaces the budget allocation and recomputes `remaining` in the
    /// same statement. `spent` is never touched here.
    ///
    /// # Errors
    ///
    /// Returns `DepartmentError::NotFound` when the id does not exist.
    pub async fn set_allocation(
        &self,
        id: Uuid,
        allocated: Decimal,
    ) -> Result<departments::Model, DepartmentError> {
        let result = departments::Entity::update_many()
            .col_expr(departments::Column::BudgetAllocated, Expr::value(allocated))
            .col_expr(
                departments::Column::BudgetRemaining,
                Expr::value(allocated).sub(Expr::col(departments::Column::BudgetSpent)),
            )
            .filter(departments::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DepartmentError::NotFound(id));
        }

        self.find_by_id(id)
            .await?
            .ok_or(DepartmentError::NotFound(id))
    }

    /// Deletes a department unless transactions still reference it. The
    /// count check and the delete run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DepartmentError::HasTransactions` when dependent
    /// transactions exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), DepartmentError> {
        let txn = self.db.begin().await?;

        let exists = departments::Entity::find_by_id(id).one(&txn).await?.is_some();
        if !exists {
            return Err(DepartmentError::NotFound(id));
        }

        let dependents = transactions::Entity::find()
            .filter(transactions::Column::DepartmentId.eq(id))
            .count(&txn)
            .await?;
        if dependents > 0 {
            return Err(DepartmentError::HasTransactions(dependents));
        }

        departments::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}
