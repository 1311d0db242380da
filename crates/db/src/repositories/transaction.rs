//! Transaction repository: creation with ledger debit, compare-and-set
//! workflow transitions, filtered listing.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use fiscora_shared::types::PageRequest;

use crate::entities::{
    departments, institutions, projects,
    sea_orm_active_enums::{RecurringFrequency, TransactionStatus, TransactionType},
    transactions,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Institution not found.
    #[error("Institution not found: {0}")]
    InstitutionNotFound(Uuid),

    /// Department not found.
    #[error("Department not found: {0}")]
    DepartmentNotFound(Uuid),

    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Referenced department or project belongs to a different institution.
    #[error("cross-institution reference: {0} does not belong to this institution")]
    CrossInstitution(&'static str),

    /// Transaction is not in the state the operation requires.
    #[error("Transaction is {0:?} and cannot be modified")]
    InvalidState(TransactionStatus),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub institution_id: Uuid,
    pub department_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub vendor_name: Option<String>,
    pub vendor_contact: Option<String>,
    pub reference: Option<String>,
    /// Defaults to now.
    pub transaction_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub attachments: serde_json::Value,
    pub tags: Vec<String>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub recurring_next_date: Option<NaiveDate>,
}

/// Updatable transaction fields; `None` leaves a field unchanged.
/// Status, approver fields, and creator are never updatable here.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub vendor_name: Option<Option<String>>,
    pub vendor_contact: Option<Option<String>>,
    pub reference: Option<Option<String>>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub attachments: Option<serde_json::Value>,
}

/// Listing filters; all optional and combinable.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub department_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction with status `pending`.
    ///
    /// Referenced department/project are re-verified against the
    /// transaction's institution inside the store transaction. When the
    /// type is `expense`, the budget debit is applied to the department
    /// and/or project atomically in the same store transaction; the debit
    /// is never reversed by later reject/delete.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::CrossInstitution` on a reference to
    /// another institution's department or project.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;

        let institution_exists = institutions::Entity::find_by_id(input.institution_id)
            .one(&txn)
            .await?
            .is_some();
        if !institution_exists {
            return Err(TransactionError::InstitutionNotFound(input.institution_id));
        }

        if let Some(department_id) = input.department_id {
            let department = departments::Entity::find_by_id(department_id)
                .one(&txn)
                .await?
                .ok_or(TransactionError::DepartmentNotFound(department_id))?;
            if department.institution_id != input.institution_id {
                return Err(TransactionError::CrossInstitution("department"));
            }
        }
        if let Some(project_id) = input.project_id {
            let project = projects::Entity::find_by_id(project_id)
                .one(&txn)
                .await?
                .ok_or(TransactionError::ProjectNotFound(project_id))?;
            if project.institution_id != input.institution_id {
                return Err(TransactionError::CrossInstitution("project"));
            }
        }

        let now = Utc::now();
        let model = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            institution_id: Set(input.institution_id),
            department_id: Set(input.department_id),
            project_id: Set(input.project_id),
            transaction_type: Set(input.transaction_type),
            amount: Set(input.amount),
            currency: Set(input.currency),
            category: Set(input.category),
            description: Set(input.description),
            vendor_name: Set(input.vendor_name),
            vendor_contact: Set(input.vendor_contact),
            reference: Set(input.reference),
            transaction_date: Set(input.transaction_date.unwrap_or(now).into()),
            status: Set(TransactionStatus::Pending),
            created_by: Set(input.created_by),
            approved_by: Set(None),
            approved_at: Set(None),
            attachments: Set(input.attachments),
            tags: Set(serde_json::json!(input.tags)),
            is_recurring: Set(input.is_recurring),
            recurring_frequency: Set(input.recurring_frequency),
            recurring_next_date: Set(input.recurring_next_date),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = model.insert(&txn).await?;

        if created.transaction_type == TransactionType::Expense {
            if let Some(department_id) = created.department_id {
                Self::debit_department(&txn, department_id, created.amount).await?;
            }
            if let Some(project_id) = created.project_id {
                Self::debit_project(&txn, project_id, created.amount).await?;
            }
        }

        txn.commit().await?;

        tracing::debug!(
            transaction_id = %created.id,
            institution_id = %created.institution_id,
            amount = %created.amount,
            "transaction created"
        );

        Ok(created)
    }

    /// Atomic department debit: `spent = spent + amount`,
    /// `remaining = allocated - (spent + amount)`.
    async fn debit_department(
        txn: &DatabaseTransaction,
        department_id: Uuid,
        amount: Decimal,
    ) -> Result<(), TransactionError> {
        departments::Entity::update_many()
            .col_expr(
                departments::Column::BudgetSpent,
                Expr::col(departments::Column::BudgetSpent).add(amount),
            )
            .col_expr(
                departments::Column::BudgetRemaining,
                Expr::col(departments::Column::BudgetAllocated)
                    .sub(Expr::col(departments::Column::BudgetSpent).add(amount)),
            )
            .filter(departments::Column::Id.eq(department_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Atomic project debit, same shape as the department debit.
    async fn debit_project(
        txn: &DatabaseTransaction,
        project_id: Uuid,
        amount: Decimal,
    ) -> Result<(), TransactionError> {
        projects::Entity::update_many()
            .col_expr(
                projects::Column::BudgetSpent,
                Expr::col(projects::Column::BudgetSpent).add(amount),
            )
            .col_expr(
                projects::Column::BudgetRemaining,
                Expr::col(projects::Column::BudgetAllocated)
                    .sub(Expr::col(projects::Column::BudgetSpent).add(amount)),
            )
            .filter(projects::Column::Id.eq(project_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists transactions, newest first, with filters and pagination.
    /// `institution_id = None` lists across institutions; the caller's
    /// policy check restricts that to admins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        institution_id: Option<Uuid>,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), TransactionError> {
        let mut query = transactions::Entity::find();

        if let Some(institution_id) = institution_id {
            query = query.filter(transactions::Column::InstitutionId.eq(institution_id));
        }
        if let Some(kind) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(kind));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(department_id) = filter.department_id {
            query = query.filter(transactions::Column::DepartmentId.eq(department_id));
        }
        if let Some(project_id) = filter.project_id {
            query = query.filter(transactions::Column::ProjectId.eq(project_id));
        }
        if let Some(category) = &filter.category {
            query = query.filter(transactions::Column::Category.eq(category));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(transactions::Column::TransactionDate)
            .offset(page.offset())
            .limit(page.db_limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// The N most recent transactions of an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent_for_institution(
        &self,
        institution_id: Uuid,
        limit: u64,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::InstitutionId.eq(institution_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// The N most recent transactions referencing a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent_for_department(
        &self,
        department_id: Uuid,
        limit: u64,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::DepartmentId.eq(department_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// The N most recent transactions referencing a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent_for_project(
        &self,
        project_id: Uuid,
        limit: u64,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::ProjectId.eq(project_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// Updates non-status fields while the transaction is `pending`.
    ///
    /// The `status = 'pending'` predicate makes the write a compare-and-set:
    /// a concurrent approve/reject wins and this update touches zero rows.
    /// Changing `amount` does not retroactively adjust the ledger.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidState` when the transaction is no
    /// longer pending.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let mut update = transactions::Entity::update_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending));

        if let Some(amount) = input.amount {
            update = update.col_expr(transactions::Column::Amount, Expr::value(amount));
        }
        if let Some(category) = input.category {
            update = update.col_expr(transactions::Column::Category, Expr::value(category));
        }
        if let Some(description) = input.description {
            update = update.col_expr(transactions::Column::Description, Expr::value(description));
        }
        if let Some(vendor_name) = input.vendor_name {
            update = update.col_expr(transactions::Column::VendorName, Expr::value(vendor_name));
        }
        if let Some(vendor_contact) = input.vendor_contact {
            update = update.col_expr(
                transactions::Column::VendorContact,
                Expr::value(vendor_contact),
            );
        }
        if let Some(reference) = input.reference {
            update = update.col_expr(transactions::Column::Reference, Expr::value(reference));
        }
        if let Some(date) = input.transaction_date {
            update = update.col_expr(transactions::Column::TransactionDate, Expr::value(date));
        }
        if let Some(tags) = input.tags {
            update = update.col_expr(
                transactions::Column::Tags,
                Expr::value(serde_json::json!(tags)),
            );
        }
        if let Some(attachments) = input.attachments {
            update = update.col_expr(transactions::Column::Attachments, Expr::value(attachments));
        }
        update = update.col_expr(
            transactions::Column::UpdatedAt,
            Expr::value(Utc::now()),
        );

        let result = update.exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(self.not_found_or_state(id).await?);
        }

        self.find_by_id(id)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Approves a pending transaction (compare-and-set on status).
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidState` when the transaction is not
    /// pending.
    pub async fn approve(
        &self,
        id: Uuid,
        approved_by: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        self.transition(id, TransactionStatus::Approved, approved_by)
            .await
    }

    /// Rejects a pending transaction (compare-and-set on status). The
    /// creation-time ledger debit stays in place.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidState` when the transaction is not
    /// pending.
    pub async fn reject(
        &self,
        id: Uuid,
        rejected_by: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        self.transition(id, TransactionStatus::Rejected, rejected_by)
            .await
    }

    async fn transition(
        &self,
        id: Uuid,
        new_status: TransactionStatus,
        decided_by: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        let now = Utc::now();
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::Status, new_status.as_enum())
            .col_expr(transactions::Column::ApprovedBy, Expr::value(decided_by))
            .col_expr(transactions::Column::ApprovedAt, Expr::value(now))
            .col_expr(transactions::Column::UpdatedAt, Expr::value(now))
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(self.not_found_or_state(id).await?);
        }

        tracing::info!(
            transaction_id = %id,
            status = ?new_status,
            decided_by = %decided_by,
            "transaction workflow transition"
        );

        self.find_by_id(id)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Deletes a pending transaction (compare-and-set delete). The
    /// creation-time ledger debit stays in place.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidState` when the transaction is not
    /// pending.
    pub async fn delete(&self, id: Uuid) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(self.not_found_or_state(id).await?);
        }

        Ok(())
    }

    /// Distinguishes a missing row from a lost compare-and-set.
    async fn not_found_or_state(&self, id: Uuid) -> Result<TransactionError, TransactionError> {
        match self.find_by_id(id).await? {
            None => Ok(TransactionError::NotFound(id)),
            Some(current) => Ok(TransactionError::InvalidState(current.status)),
        }
    }
}
