//! Budget routes: institution summary, per-unit detail, allocation writes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::authz::{self, Action, ResourceCtx};
use fiscora_core::budget::{BudgetFigures, BudgetService};
use fiscora_core::reports::{BudgetLine, BudgetSummary, ReportService};
use fiscora_db::entities::transactions;
use fiscora_db::repositories::{
    DepartmentRepository, InstitutionRepository, ProjectRepository, ReportRepository,
    TransactionRepository,
};
use fiscora_shared::AppError;

const RECENT_LIMIT: u64 = 10;

/// Creates the budget router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/summary/{institution_id}", get(summary))
        .route(
            "/budgets/department/{id}",
            get(department_detail).put(set_department_allocation),
        )
        .route(
            "/budgets/project/{id}",
            get(project_detail).put(set_project_allocation),
        )
}

#[derive(Debug, Deserialize)]
struct SetAllocationRequest {
    allocated: Decimal,
}

/// Budget line plus the most recent transactions charged against it.
#[derive(Debug, Serialize)]
struct BudgetDetail {
    #[serde(flatten)]
    line: BudgetLine,
    recent_transactions: Vec<transactions::Model>,
}

async fn institution_public(state: &AppState, institution_id: Uuid) -> ApiResult<bool> {
    let institution = InstitutionRepository::new((*state.db).clone())
        .find_by_id(institution_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {institution_id}"))))?;
    Ok(institution.allow_public_viewing)
}

/// GET /budgets/summary/{institution_id} - Institution-wide budget summary.
async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(institution_id): Path<Uuid>,
) -> ApiResult<Json<BudgetSummary>> {
    let public = institution_public(&state, institution_id).await?;
    let ctx = ResourceCtx::institution(institution_id, public);
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;

    let reports = ReportRepository::new((*state.db).clone());
    let departments = reports.department_figures(institution_id).await?;
    let projects = reports.project_figures(institution_id).await?;

    Ok(Json(ReportService::budget_summary(departments, projects)))
}

/// GET /budgets/department/{id} - Department figures plus recent activity.
async fn department_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BudgetDetail>> {
    let department = DepartmentRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("department {id}"))))?;

    let public = institution_public(&state, department.institution_id).await?;
    let ctx = ResourceCtx::department(department.institution_id, department.head_user_id, public);
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;

    let recent = TransactionRepository::new((*state.db).clone())
        .recent_for_department(id, RECENT_LIMIT)
        .await?;

    let figures = BudgetFigures::new(department.budget_allocated, department.budget_spent);
    Ok(Json(BudgetDetail {
        line: ReportService::budget_line(department.id, department.name, figures),
        recent_transactions: recent,
    }))
}

/// PUT /budgets/department/{id} - Replace the department allocation.
async fn set_department_allocation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAllocationRequest>,
) -> ApiResult<Json<BudgetLine>> {
    let repo = DepartmentRepository::new((*state.db).clone());
    let department = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("department {id}"))))?;

    let public = institution_public(&state, department.institution_id).await?;
    let ctx = ResourceCtx::department(department.institution_id, department.head_user_id, public);
    authz::authorize(&user.actor()?, Action::SetAllocation, &ctx)?;

    let current = BudgetFigures::new(department.budget_allocated, department.budget_spent);
    BudgetService::set_allocation(current, payload.allocated)?;

    let updated = repo.set_allocation(id, payload.allocated).await?;
    let figures = BudgetFigures::new(updated.budget_allocated, updated.budget_spent);
    Ok(Json(ReportService::budget_line(
        updated.id,
        updated.name,
        figures,
    )))
}

/// GET /budgets/project/{id} - Project figures plus recent activity.
async fn project_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BudgetDetail>> {
    let project = ProjectRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("project {id}"))))?;

    let inst_public = institution_public(&state, project.institution_id).await?;
    let ctx = ResourceCtx::project(
        project.institution_id,
        project.manager_user_id,
        project.is_public,
        inst_public,
    );
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;

    let recent = TransactionRepository::new((*state.db).clone())
        .recent_for_project(id, RECENT_LIMIT)
        .await?;

    let figures = BudgetFigures::new(project.budget_allocated, project.budget_spent);
    Ok(Json(BudgetDetail {
        line: ReportService::budget_line(project.id, project.name, figures),
        recent_transactions: recent,
    }))
}

/// PUT /budgets/project/{id} - Replace the project allocation.
async fn set_project_allocation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAllocationRequest>,
) -> ApiResult<Json<BudgetLine>> {
    let repo = ProjectRepository::new((*state.db).clone());
    let project = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("project {id}"))))?;

    let inst_public = institution_public(&state, project.institution_id).await?;
    let ctx = ResourceCtx::project(
        project.institution_id,
        project.manager_user_id,
        project.is_public,
        inst_public,
    );
    authz::authorize(&user.actor()?, Action::SetAllocation, &ctx)?;

    let current = BudgetFigures::new(project.budget_allocated, project.budget_spent);
    BudgetService::set_allocation(current, payload.allocated)?;

    let updated = repo.set_allocation(id, payload.allocated).await?;
    let figures = BudgetFigures::new(updated.budget_allocated, updated.budget_spent);
    Ok(Json(ReportService::budget_line(
        updated.id,
        updated.name,
        figures,
    )))
}
