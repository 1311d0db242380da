//! Dashboard route: one payload for the institution overview screen.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::authz::{self, Action, ResourceCtx};
use fiscora_core::reports::{BudgetLine, MonthlyBucket, ReportService};
use fiscora_db::entities::transactions;
use fiscora_db::repositories::{InstitutionRepository, ReportRepository, TransactionRepository};
use fiscora_shared::AppError;

const RECENT_LIMIT: u64 = 10;

/// Creates the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/{institution_id}", get(dashboard))
}

/// Everything the institution overview needs in one response.
#[derive(Debug, Serialize)]
struct Dashboard {
    recent_transactions: Vec<transactions::Model>,
    department_budgets: Vec<BudgetLine>,
    monthly_spending: Vec<MonthlyBucket>,
}

/// GET /dashboard/{institution_id} - Recent transactions, per-department
/// budget lines, and a trailing twelve-month spending series.
async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
    Path(institution_id): Path<Uuid>,
) -> ApiResult<Json<Dashboard>> {
    let institution = InstitutionRepository::new((*state.db).clone())
        .find_by_id(institution_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {institution_id}"))))?;

    let ctx = ResourceCtx::institution(institution_id, institution.allow_public_viewing);
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;

    let recent = TransactionRepository::new((*state.db).clone())
        .recent_for_institution(institution_id, RECENT_LIMIT)
        .await?;

    let reports = ReportRepository::new((*state.db).clone());
    let department_budgets = reports
        .department_figures(institution_id)
        .await?
        .into_iter()
        .map(|(id, name, figures)| ReportService::budget_line(id, name, figures))
        .collect();

    let monthly_rows = reports.monthly_totals(institution_id).await?;
    let now = Utc::now();
    let monthly_spending = ReportService::trailing_months(now.year(), now.month(), &monthly_rows);

    Ok(Json(Dashboard {
        recent_transactions: recent,
        department_budgets,
        monthly_spending,
    }))
}
