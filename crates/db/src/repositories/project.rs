//! Project repository for database operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    departments, institutions, projects, sea_orm_active_enums::ProjectStatus, transactions,
};

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Project not found.
    #[error("Project not found: {0}")]
    NotFound(Uuid),

    /// Institution not found.
    #[error("Institution not found: {0}")]
    InstitutionNotFound(Uuid),

    /// Department not found.
    #[error("Department not found: {0}")]
    DepartmentNotFound(Uuid),

    /// Department belongs to a different institution.
    #[error("Department belongs to a different institution")]
    DepartmentNotInInstitution,

    /// Project has dependent transactions and cannot be deleted.
    #[error("Project has {0} transactions and cannot be deleted")]
    HasTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    pub institution_id: Uuid,
    pub department_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub manager_user_id: Option<Uuid>,
    pub budget_allocated: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub is_public: bool,
}

/// Updatable project fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub manager_user_id: Option<Option<Uuid>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub actual_start_date: Option<Option<NaiveDate>>,
    pub actual_end_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Project repository for CRUD and allocation writes.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new project. A referenced department must belong to the
    /// same institution.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::DepartmentNotInInstitution` on a
    /// cross-institution department reference.
    pub async fn create(&self, input: CreateProjectInput) -> Result<projects::Model, ProjectError> {
        let institution_exists = institutions::Entity::find_by_id(input.institution_id)
            .one(&self.db)
            .await?
            .is_some();
        if !institution_exists {
            return Err(ProjectError::InstitutionNotFound(input.institution_id));
        }

        if let Some(department_id) = input.department_id {
            let department = departments::Entity::find_by_id(department_id)
                .one(&self.db)
                .await?
                .ok_or(ProjectError::DepartmentNotFound(department_id))?;
            if department.institution_id != input.institution_id {
                return Err(ProjectError::DepartmentNotInInstitution);
            }
        }

        let now = Utc::now().into();
        let project = projects::ActiveModel {
            id: Set(Uuid::now_v7()),
            institution_id: Set(input.institution_id),
            department_id: Set(input.department_id),
            name: Set(input.name),
            description: Set(input.description),
            status: Set(ProjectStatus::Planning),
            manager_user_id: Set(input.manager_user_id),
            budget_allocated: Set(input.budget_allocated),
            budget_spent: Set(Decimal::ZERO),
            budget_remaining: Set(input.budget_allocated),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            actual_start_date: Set(None),
            actual_end_date: Set(None),
            tags: Set(serde_json::json!(input.tags)),
            is_public: Set(input.is_public),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(project.insert(&self.db).await?)
    }

    /// Finds a project by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<projects::Model>, ProjectError> {
        Ok(projects::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists projects of an institution with an optional status filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_institution(
        &self,
        institution_id: Uuid,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<projects::Model>, ProjectError> {
        let mut query = projects::Entity::find()
            .filter(projects::Column::InstitutionId.eq(institution_id));
        if let Some(status) = status {
            query = query.filter(projects::Column::Status.eq(status));
        }

        Ok(query
            .order_by_asc(projects::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Applies a partial update to non-budget fields.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` when the id does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProjectInput,
    ) -> Result<projects::Model, ProjectError> {
        let project = self.find_by_id(id).await?.ok_or(ProjectError::NotFound(id))?;

        let mut active: projects::ActiveModel = project.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(manager) = input.manager_user_id {
            active.manager_user_id = Set(manager);
        }
        if let Some(start) = input.start_date {
            active.start_date = Set(start);
        }
        if let Some(end) = input.end_date {
            active.end_date = Set(end);
        }
        if let Some(start) = input.actual_start_date {
            active.actual_start_date = Set(start);
        }
        if let Some(end) = input.actual_end_date {
            active.actual_end_date = Set(end);
        }
        if let Some(tags) = input.tags {
            active.tags = Set(serde_json::json!(tags));
        }
        if let Some(flag) = input.is_public {
            active.is_public = Set(flag);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Replaces the budget allocation and recomputes `remaining` in the
    /// same statement. `spent` is never touched here.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` when the id does not exist.
    pub async fn set_allocation(
        &self,
        id: Uuid,
        allocated: Decimal,
    ) -> Result<projects::Model, ProjectError> {
        let result = projects::Entity::update_many()
            .col_expr(projects::Column::BudgetAllocated, Expr::value(allocated))
            .col_expr(
                projects::Column::BudgetRemaining,
                Expr::value(allocated).sub(Expr::col(projects::Column::BudgetSpent)),
            )
            .filter(projects::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ProjectError::NotFound(id));
        }

        self.find_by_id(id).await?.ok_or(ProjectError::NotFound(id))
    }

    /// Deletes a project unless transactions still reference it. The count
    /// check and the delete run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::HasTransactions` when dependent transactions
    /// exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProjectError> {
        let txn = self.db.begin().await?;

        let exists = projects::Entity::find_by_id(id).one(&txn).await?.is_some();
        if !exists {
            return Err(ProjectError::NotFound(id));
        }

        let dependents = transactions::Entity::find()
            .filter(transactions::Column::ProjectId.eq(id))
            .count(&txn)
            .await?;
        if dependents > 0 {
            return Err(ProjectError::HasTransactions(dependents));
        }

        projects::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}
