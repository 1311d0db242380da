//! Institution repository for database operations.

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use fiscora_shared::types::PageRequest;

use crate::entities::{
    departments, institutions, projects, sea_orm_active_enums::InstitutionType, transactions,
};

/// Error types for institution operations.
#[derive(Debug, thiserror::Error)]
pub enum InstitutionError {
    /// Institution not found.
    #[error("Institution not found: {0}")]
    NotFound(Uuid),

    /// Institution name already exists.
    #[error("Institution name already exists")]
    DuplicateName,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an institution.
#[derive(Debug, Clone)]
pub struct CreateInstitutionInput {
    pub name: String,
    pub institution_type: InstitutionType,
    pub description: Option<String>,
    /// Defaults to January 1 of the current year.
    pub fiscal_year_start: Option<NaiveDate>,
    /// Defaults to December 31 of the current year.
    pub fiscal_year_end: Option<NaiveDate>,
    pub currency: String,
    pub allow_public_viewing: bool,
    pub require_approval: bool,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
}

/// Updatable institution fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateInstitutionInput {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub fiscal_year_start: Option<NaiveDate>,
    pub fiscal_year_end: Option<NaiveDate>,
    pub currency: Option<String>,
    pub allow_public_viewing: Option<bool>,
    pub require_approval: Option<bool>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Institution with its dependent-record counts.
#[derive(Debug, Clone)]
pub struct InstitutionSummary {
    pub institution: institutions::Model,
    pub department_count: u64,
    pub project_count: u64,
    pub transaction_count: u64,
}

/// Institution repository for CRUD and cascade delete.
#[derive(Debug, Clone)]
pub struct InstitutionRepository {
    db: DatabaseConnection,
}

impl InstitutionRepository {
    /// Creates a new institution repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new institution. Fiscal window defaults to the current
    /// calendar year.
    ///
    /// # Errors
    ///
    /// Returns `InstitutionError::DuplicateName` when the name is taken.
    pub async fn create(
        &self,
        input: CreateInstitutionInput,
    ) -> Result<institutions::Model, InstitutionError> {
        let name_taken = institutions::Entity::find()
            .filter(institutions::Column::Name.eq(&input.name))
            .count(&self.db)
            .await?
            > 0;
        if name_taken {
            return Err(InstitutionError::DuplicateName);
        }

        let today = Utc::now().date_naive();
        let year_start = today
            .with_month(1)
            .and_then(|d| d.with_day(1))
            .unwrap_or(today);
        let year_end = today
            .with_month(12)
            .and_then(|d| d.with_day(31))
            .unwrap_or(today);

        let now = Utc::now().into();
        let institution = institutions::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            institution_type: Set(input.institution_type),
            description: Set(input.description),
            fiscal_year_start: Set(input.fiscal_year_start.unwrap_or(year_start)),
            fiscal_year_end: Set(input.fiscal_year_end.unwrap_or(year_end)),
            currency: Set(input.currency),
            allow_public_viewing: Set(input.allow_public_viewing),
            require_approval: Set(input.require_approval),
            address: Set(input.address),
            city: Set(input.city),
            country: Set(input.country),
            website: Set(input.website),
            contact_email: Set(input.contact_email),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(institution.insert(&self.db).await?)
    }

    /// Finds an institution by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<institutions::Model>, InstitutionError> {
        Ok(institutions::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds an institution with department/project/transaction counts.
    ///
    /// # Errors
    ///
    /// Returns `InstitutionError::NotFound` when the id does not exist.
    pub async fn find_summary(&self, id: Uuid) -> Result<InstitutionSummary, InstitutionError> {
        let institution = self
            .find_by_id(id)
            .await?
            .ok_or(InstitutionError::NotFound(id))?;

        let department_count = departments::Entity::find()
            .filter(departments::Column::InstitutionId.eq(id))
            .count(&self.db)
            .await?;
        let project_count = projects::Entity::find()
            .filter(projects::Column::InstitutionId.eq(id))
            .count(&self.db)
            .await?;
        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::InstitutionId.eq(id))
            .count(&self.db)
            .await?;

        Ok(InstitutionSummary {
            institution,
            department_count,
            project_count,
            transaction_count,
        })
    }

    /// Lists institutions visible to the caller.
    ///
    /// Admins see everything; everyone else sees their home institution
    /// plus institutions flagged for public viewing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_visible(
        &self,
        home_institution: Option<Uuid>,
        is_admin: bool,
        page: &PageRequest,
    ) -> Result<(Vec<institutions::Model>, u64), InstitutionError> {
        let mut query = institutions::Entity::find()
            .filter(institutions::Column::IsActive.eq(true));

        if !is_admin {
            let mut visible = Condition::any()
                .add(institutions::Column::AllowPublicViewing.eq(true));
            if let Some(home) = home_institution {
                visible = visible.add(institutions::Column::Id.eq(home));
            }
            query = query.filter(visible);
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_asc(institutions::Column::Name)
            .offset(page.offset())
            .limit(page.db_limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `InstitutionError::NotFound` when the id does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateInstitutionInput,
    ) -> Result<institutions::Model, InstitutionError> {
        let institution = self
            .find_by_id(id)
            .await?
            .ok_or(InstitutionError::NotFound(id))?;

        let mut active: institutions::ActiveModel = institution.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(start) = input.fiscal_year_start {
            active.fiscal_year_start = Set(start);
        }
        if let Some(end) = input.fiscal_year_end {
            active.fiscal_year_end = Set(end);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(currency);
        }
        if let Some(flag) = input.allow_public_viewing {
            active.allow_public_viewing = Set(flag);
        }
        if let Some(flag) = input.require_approval {
            active.require_approval = Set(flag);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(country) = input.country {
            active.country = Set(country);
        }
        if let Some(website) = input.website {
            active.website = Set(website);
        }
        if let Some(contact_email) = input.contact_email {
            active.contact_email = Set(contact_email);
        }
        if let Some(flag) = input.is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an institution and everything it owns in one transaction:
    /// transactions, then projects, then departments, then the institution.
    ///
    /// # Errors
    ///
    /// Returns `InstitutionError::NotFound` when the id does not exist.
    pub async fn delete_cascade(&self, id: Uuid) -> Result<(), InstitutionError> {
        let txn = self.db.begin().await?;

        let exists = institutions::Entity::find_by_id(id).one(&txn).await?.is_some();
        if !exists {
            return Err(InstitutionError::NotFound(id));
        }

        let deleted_transactions = transactions::Entity::delete_many()
            .filter(transactions::Column::InstitutionId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let deleted_projects = projects::Entity::delete_many()
            .filter(projects::Column::InstitutionId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let deleted_departments = departments::Entity::delete_many()
            .filter(departments::Column::InstitutionId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        institutions::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            institution_id = %id,
            deleted_transactions,
            deleted_projects,
            deleted_departments,
            "institution cascade delete completed"
        );

        Ok(())
    }
}
