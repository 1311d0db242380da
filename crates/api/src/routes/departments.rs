//! Department routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::authz::{self, Action, ResourceCtx, ResourceKind};
use fiscora_core::budget::{BudgetFigures, BudgetService};
use fiscora_db::entities::departments;
use fiscora_db::repositories::{
    CreateDepartmentInput, DepartmentRepository, InstitutionRepository, UpdateDepartmentInput,
};
use fiscora_shared::AppError;

/// Creates the department router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list).post(create))
        .route(
            "/departments/{id}",
            get(get_one).put(update).delete(delete),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    institution_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateDepartmentRequest {
    institution_id: Uuid,
    #[validate(length(min = 2, max = 150, message = "must be 2-150 characters"))]
    name: String,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    code: Option<String>,
    description: Option<String>,
    head_user_id: Option<Uuid>,
    #[serde(default)]
    budget_allocated: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateDepartmentRequest {
    #[validate(length(min = 2, max = 150, message = "must be 2-150 characters"))]
    name: Option<String>,
    code: Option<Option<String>>,
    description: Option<Option<String>>,
    head_user_id: Option<Option<Uuid>>,
    is_active: Option<bool>,
}

/// Loads the institution's public-viewing flag for policy contexts.
async fn institution_public(state: &AppState, institution_id: Uuid) -> ApiResult<bool> {
    let institution = InstitutionRepository::new((*state.db).clone())
        .find_by_id(institution_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {institution_id}"))))?;
    Ok(institution.allow_public_viewing)
}

async fn load_with_ctx(
    state: &AppState,
    id: Uuid,
) -> ApiResult<(departments::Model, ResourceCtx)> {
    let department = DepartmentRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("department {id}"))))?;

    let public = institution_public(state, department.institution_id).await?;
    let ctx = ResourceCtx::department(department.institution_id, department.head_user_id, public);
    Ok((department, ctx))
}

/// GET /departments?institution_id= - Departments of one institution.
async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<departments::Model>>> {
    let public = institution_public(&state, query.institution_id).await?;
    let ctx = ResourceCtx::institution(query.institution_id, public);
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;

    let items = DepartmentRepository::new((*state.db).clone())
        .list_by_institution(query.institution_id)
        .await?;
    Ok(Json(items))
}

/// GET /departments/{id} - One department.
async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<departments::Model>> {
    let (department, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;
    Ok(Json(department))
}

/// POST /departments - Create a department.
async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    BudgetService::set_allocation(BudgetFigures::zero(), payload.budget_allocated)?;

    let ctx = ResourceCtx::new_resource(ResourceKind::Department, payload.institution_id);
    authz::authorize(&user.actor()?, Action::Create, &ctx)?;

    let created = DepartmentRepository::new((*state.db).clone())
        .create(CreateDepartmentInput {
            institution_id: payload.institution_id,
            name: payload.name,
            code: payload.code,
            description: payload.description,
            head_user_id: payload.head_user_id,
            budget_allocated: payload.budget_allocated,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /departments/{id} - Update non-budget fields.
async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> ApiResult<Json<departments::Model>> {
    payload.validate()?;

    let (_, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Update, &ctx)?;

    let updated = DepartmentRepository::new((*state.db).clone())
        .update(
            id,
            UpdateDepartmentInput {
                name: payload.name,
                code: payload.code,
                description: payload.description,
                head_user_id: payload.head_user_id,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(updated))
}

/// DELETE /departments/{id} - Delete; blocked while transactions reference it.
async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let (_, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Delete, &ctx)?;

    DepartmentRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
