//! Postgres enum mappings.
//!
//! Each type mirrors a `CREATE TYPE ... AS ENUM` in the initial migration.
//! Conversions to/from the `fiscora-core` enums live here so repositories
//! and handlers never match on raw strings.

use fiscora_core::authz::UserRole as CoreUserRole;
use fiscora_core::workflow::{
    RecurringFrequency as CoreRecurringFrequency, TransactionStatus as CoreTransactionStatus,
    TransactionType as CoreTransactionType,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "institution_admin")]
    InstitutionAdmin,
    #[sea_orm(string_value = "department_head")]
    DepartmentHead,
    #[sea_orm(string_value = "project_manager")]
    ProjectManager,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl From<CoreUserRole> for UserRole {
    fn from(role: CoreUserRole) -> Self {
        match role {
            CoreUserRole::Admin => Self::Admin,
            CoreUserRole::InstitutionAdmin => Self::InstitutionAdmin,
            CoreUserRole::DepartmentHead => Self::DepartmentHead,
            CoreUserRole::ProjectManager => Self::ProjectManager,
            CoreUserRole::Viewer => Self::Viewer,
        }
    }
}

impl From<UserRole> for CoreUserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::InstitutionAdmin => Self::InstitutionAdmin,
            UserRole::DepartmentHead => Self::DepartmentHead,
            UserRole::ProjectManager => Self::ProjectManager,
            UserRole::Viewer => Self::Viewer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "institution_type")]
#[serde(rename_all = "snake_case")]
pub enum InstitutionType {
    #[sea_orm(string_value = "government")]
    Government,
    #[sea_orm(string_value = "university")]
    University,
    #[sea_orm(string_value = "school")]
    School,
    #[sea_orm(string_value = "ngo")]
    Ngo,
    #[sea_orm(string_value = "hospital")]
    Hospital,
    #[sea_orm(string_value = "municipality")]
    Municipality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_status")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "planning")]
    Planning,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "on_hold")]
    OnHold,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl From<CoreTransactionStatus> for TransactionStatus {
    fn from(status: CoreTransactionStatus) -> Self {
        match status {
            CoreTransactionStatus::Pending => Self::Pending,
            CoreTransactionStatus::Approved => Self::Approved,
            CoreTransactionStatus::Rejected => Self::Rejected,
            CoreTransactionStatus::Completed => Self::Completed,
        }
    }
}

impl From<TransactionStatus> for CoreTransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Approved => Self::Approved,
            TransactionStatus::Rejected => Self::Rejected,
            TransactionStatus::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<CoreTransactionType> for TransactionType {
    fn from(kind: CoreTransactionType) -> Self {
        match kind {
            CoreTransactionType::Expense => Self::Expense,
            CoreTransactionType::Income => Self::Income,
            CoreTransactionType::Transfer => Self::Transfer,
            CoreTransactionType::Adjustment => Self::Adjustment,
        }
    }
}

impl From<TransactionType> for CoreTransactionType {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Expense => Self::Expense,
            TransactionType::Income => Self::Income,
            TransactionType::Transfer => Self::Transfer,
            TransactionType::Adjustment => Self::Adjustment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "recurring_frequency")]
#[serde(rename_all = "snake_case")]
pub enum RecurringFrequency {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl From<CoreRecurringFrequency> for RecurringFrequency {
    fn from(freq: CoreRecurringFrequency) -> Self {
        match freq {
            CoreRecurringFrequency::Daily => Self::Daily,
            CoreRecurringFrequency::Weekly => Self::Weekly,
            CoreRecurringFrequency::Monthly => Self::Monthly,
            CoreRecurringFrequency::Quarterly => Self::Quarterly,
            CoreRecurringFrequency::Yearly => Self::Yearly,
        }
    }
}

impl From<RecurringFrequency> for CoreRecurringFrequency {
    fn from(freq: RecurringFrequency) -> Self {
        match freq {
            RecurringFrequency::Daily => Self::Daily,
            RecurringFrequency::Weekly => Self::Weekly,
            RecurringFrequency::Monthly => Self::Monthly,
            RecurringFrequency::Quarterly => Self::Quarterly,
            RecurringFrequency::Yearly => Self::Yearly,
        }
    }
}
