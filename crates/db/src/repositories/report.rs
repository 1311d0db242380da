//! Report repository: grouped aggregation queries.
//!
//! Grouped queries run once per report; shaping (sorting, zero-filling,
//! utilization) is done by `fiscora_core::reports`.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Statement,
};
use uuid::Uuid;

use fiscora_core::budget::BudgetFigures;
use fiscora_core::reports::{CategoryTotal, MonthlyBucket};

use crate::entities::{
    departments, projects,
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Settled expense statuses counted by spending reports.
const SPENDING_SQL_FILTER: &str =
    "transaction_type = 'expense' AND status IN ('approved', 'completed')";

/// Report repository for grouped aggregations.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Per-department budget figures for an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn department_figures(
        &self,
        institution_id: Uuid,
    ) -> Result<Vec<(Uuid, String, BudgetFigures)>, ReportError> {
        let rows: Vec<(Uuid, String, Decimal, Decimal)> = departments::Entity::find()
            .filter(departments::Column::InstitutionId.eq(institution_id))
            .select_only()
            .column(departments::Column::Id)
            .column(departments::Column::Name)
            .column(departments::Column::BudgetAllocated)
            .column(departments::Column::BudgetSpent)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, allocated, spent)| (id, name, BudgetFigures::new(allocated, spent)))
            .collect())
    }

    /// Per-project budget figures for an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn project_figures(
        &self,
        institution_id: Uuid,
    ) -> Result<Vec<(Uuid, String, BudgetFigures)>, ReportError> {
        let rows: Vec<(Uuid, String, Decimal, Decimal)> = projects::Entity::find()
            .filter(projects::Column::InstitutionId.eq(institution_id))
            .select_only()
            .column(projects::Column::Id)
            .column(projects::Column::Name)
            .column(projects::Column::BudgetAllocated)
            .column(projects::Column::BudgetSpent)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, allocated, spent)| (id, name, BudgetFigures::new(allocated, spent)))
            .collect())
    }

    /// Settled expense totals grouped by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn category_totals(
        &self,
        institution_id: Uuid,
    ) -> Result<Vec<CategoryTotal>, ReportError> {
        let rows: Vec<(String, Decimal, i64)> = transactions::Entity::find()
            .filter(transactions::Column::InstitutionId.eq(institution_id))
            .filter(transactions::Column::TransactionType.eq(TransactionType::Expense))
            .filter(
                transactions::Column::Status
                    .is_in([TransactionStatus::Approved, TransactionStatus::Completed]),
            )
            .select_only()
            .column(transactions::Column::Category)
            .column_as(transactions::Column::Amount.sum(), "total")
            .column_as(transactions::Column::Id.count(), "count")
            .group_by(transactions::Column::Category)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category, total, count)| CategoryTotal {
                category,
                total,
                count,
            })
            .collect())
    }

    /// Settled expense totals grouped by calendar month of the transaction
    /// date. One grouped query; callers zero-fill and window the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn monthly_totals(
        &self,
        institution_id: Uuid,
    ) -> Result<Vec<MonthlyBucket>, ReportError> {
        let sql = format!(
            "SELECT \
                 EXTRACT(YEAR FROM transaction_date)::int4 AS year, \
                 EXTRACT(MONTH FROM transaction_date)::int4 AS month, \
                 SUM(amount) AS total \
             FROM transactions \
             WHERE institution_id = $1 AND {SPENDING_SQL_FILTER} \
             GROUP BY 1, 2 \
             ORDER BY 1, 2"
        );
        let statement =
            Statement::from_sql_and_values(DbBackend::Postgres, sql, [institution_id.into()]);

        let rows = self.db.query_all(statement).await?;
        let mut buckets = Vec::with_capacity(rows.len());
        for row in rows {
            let year: i32 = row.try_get("", "year")?;
            let month: i32 = row.try_get("", "month")?;
            let total: Decimal = row.try_get("", "total")?;
            buckets.push(MonthlyBucket::new(year, month.unsigned_abs(), total));
        }

        Ok(buckets)
    }
}
