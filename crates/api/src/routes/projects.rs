//! Project routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::authz::{self, Action, ResourceCtx, ResourceKind};
use fiscora_core::budget::{BudgetFigures, BudgetService};
use fiscora_db::entities::{projects, sea_orm_active_enums::ProjectStatus};
use fiscora_db::repositories::{
    CreateProjectInput, InstitutionRepository, ProjectRepository, UpdateProjectInput,
};
use fiscora_shared::AppError;

/// Creates the project router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list).post(create))
        .route("/projects/{id}", get(get_one).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    institution_id: Uuid,
    status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateProjectRequest {
    institution_id: Uuid,
    department_id: Option<Uuid>,
    #[validate(length(min = 2, max = 200, message = "must be 2-200 characters"))]
    name: String,
    description: Option<String>,
    manager_user_id: Option<Uuid>,
    #[serde(default)]
    budget_allocated: Decimal,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_public: bool,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateProjectRequest {
    #[validate(length(min = 2, max = 200, message = "must be 2-200 characters"))]
    name: Option<String>,
    description: Option<Option<String>>,
    status: Option<ProjectStatus>,
    manager_user_id: Option<Option<Uuid>>,
    start_date: Option<Option<NaiveDate>>,
    end_date: Option<Option<NaiveDate>>,
    actual_start_date: Option<Option<NaiveDate>>,
    actual_end_date: Option<Option<NaiveDate>>,
    tags: Option<Vec<String>>,
    is_public: Option<bool>,
}

async fn institution_public(state: &AppState, institution_id: Uuid) -> ApiResult<bool> {
    let institution = InstitutionRepository::new((*state.db).clone())
        .find_by_id(institution_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {institution_id}"))))?;
    Ok(institution.allow_public_viewing)
}

async fn load_with_ctx(state: &AppState, id: Uuid) -> ApiResult<(projects::Model, ResourceCtx)> {
    let project = ProjectRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("project {id}"))))?;

    let inst_public = institution_public(state, project.institution_id).await?;
    let ctx = ResourceCtx::project(
        project.institution_id,
        project.manager_user_id,
        project.is_public,
        inst_public,
    );
    Ok((project, ctx))
}

/// GET /projects?institution_id=&status= - Projects of one institution.
async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<projects::Model>>> {
    let public = institution_public(&state, query.institution_id).await?;
    let ctx = ResourceCtx::institution(query.institution_id, public);
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;

    let items = ProjectRepository::new((*state.db).clone())
        .list_by_institution(query.institution_id, query.status)
        .await?;
    Ok(Json(items))
}

/// GET /projects/{id} - One project.
async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<projects::Model>> {
    let (project, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;
    Ok(Json(project))
}

/// POST /projects - Create a project in planning status.
async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    BudgetService::set_allocation(BudgetFigures::zero(), payload.budget_allocated)?;

    let ctx = ResourceCtx::new_resource(ResourceKind::Project, payload.institution_id);
    authz::authorize(&user.actor()?, Action::Create, &ctx)?;

    let created = ProjectRepository::new((*state.db).clone())
        .create(CreateProjectInput {
            institution_id: payload.institution_id,
            department_id: payload.department_id,
            name: payload.name,
            description: payload.description,
            manager_user_id: payload.manager_user_id,
            budget_allocated: payload.budget_allocated,
            start_date: payload.start_date,
            end_date: payload.end_date,
            tags: payload.tags,
            is_public: payload.is_public,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /projects/{id} - Update non-budget fields.
async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> ApiResult<Json<projects::Model>> {
    payload.validate()?;

    let (_, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Update, &ctx)?;

    let updated = ProjectRepository::new((*state.db).clone())
        .update(
            id,
            UpdateProjectInput {
                name: payload.name,
                description: payload.description,
                status: payload.status,
                manager_user_id: payload.manager_user_id,
                start_date: payload.start_date,
                end_date: payload.end_date,
                actual_start_date: payload.actual_start_date,
                actual_end_date: payload.actual_end_date,
                tags: payload.tags,
                is_public: payload.is_public,
            },
        )
        .await?;

    Ok(Json(updated))
}

/// DELETE /projects/{id} - Delete; blocked while transactions reference it.
async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let (_, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Delete, &ctx)?;

    ProjectRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
