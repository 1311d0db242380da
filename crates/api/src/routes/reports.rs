//! Reporting routes: category breakdown and monthly spending.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::authz::{self, Action, ResourceCtx};
use fiscora_core::reports::{CategoryTotal, MonthlyBucket, ReportService};
use fiscora_db::repositories::{InstitutionRepository, ReportRepository};
use fiscora_shared::AppError;

/// Creates the report router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/categories/{institution_id}", get(categories))
        .route("/reports/monthly/{institution_id}", get(monthly))
}

async fn check_read(state: &AppState, user: &AuthUser, institution_id: Uuid) -> ApiResult<()> {
    let institution = InstitutionRepository::new((*state.db).clone())
        .find_by_id(institution_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {institution_id}"))))?;

    let ctx = ResourceCtx::institution(institution_id, institution.allow_public_viewing);
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;
    Ok(())
}

/// GET /reports/categories/{institution_id} - Settled expense totals per
/// category, largest first.
async fn categories(
    State(state): State<AppState>,
    user: AuthUser,
    Path(institution_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CategoryTotal>>> {
    check_read(&state, &user, institution_id).await?;

    let rows = ReportRepository::new((*state.db).clone())
        .category_totals(institution_id)
        .await?;

    Ok(Json(ReportService::category_breakdown(rows)))
}

/// GET /reports/monthly/{institution_id} - Monthly settled spending,
/// chronological, capped to the trailing window.
async fn monthly(
    State(state): State<AppState>,
    user: AuthUser,
    Path(institution_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MonthlyBucket>>> {
    check_read(&state, &user, institution_id).await?;

    let rows = ReportRepository::new((*state.db).clone())
        .monthly_totals(institution_id)
        .await?;

    Ok(Json(ReportService::monthly_spending(rows)))
}
