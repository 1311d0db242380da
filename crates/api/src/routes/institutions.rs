//! Institution routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::authz::{self, Action, ResourceCtx};
use fiscora_db::entities::{institutions, sea_orm_active_enums::InstitutionType};
use fiscora_db::repositories::{
    CreateInstitutionInput, InstitutionRepository, UpdateInstitutionInput,
};
use fiscora_shared::AppError;
use fiscora_shared::types::{Currency, PageRequest, PageResponse};

/// Creates the institution router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/institutions", get(list).post(create))
        .route(
            "/institutions/{id}",
            get(get_one).put(update).delete(delete),
        )
}

#[derive(Debug, Deserialize, Validate)]
struct CreateInstitutionRequest {
    #[validate(length(min = 2, max = 200, message = "must be 2-200 characters"))]
    name: String,
    institution_type: InstitutionType,
    description: Option<String>,
    fiscal_year_start: Option<NaiveDate>,
    fiscal_year_end: Option<NaiveDate>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    allow_public_viewing: bool,
    #[serde(default = "default_true")]
    require_approval: bool,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    website: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    contact_email: Option<String>,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateInstitutionRequest {
    #[validate(length(min = 2, max = 200, message = "must be 2-200 characters"))]
    name: Option<String>,
    description: Option<Option<String>>,
    fiscal_year_start: Option<NaiveDate>,
    fiscal_year_end: Option<NaiveDate>,
    currency: Option<String>,
    allow_public_viewing: Option<bool>,
    require_approval: Option<bool>,
    address: Option<Option<String>>,
    city: Option<Option<String>>,
    country: Option<Option<String>>,
    website: Option<Option<String>>,
    contact_email: Option<Option<String>>,
    is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
struct InstitutionDetail {
    #[serde(flatten)]
    institution: institutions::Model,
    department_count: u64,
    project_count: u64,
    transaction_count: u64,
}

/// GET /institutions - Institutions visible to the caller, paginated.
async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<institutions::Model>>> {
    let repo = InstitutionRepository::new((*state.db).clone());
    let (items, total) = repo
        .list_visible(user.institution_id(), user.is_admin(), &page)
        .await?;

    Ok(Json(PageResponse::new(
        items,
        page.page,
        page.clamped_limit(),
        total,
    )))
}

/// GET /institutions/{id} - One institution with dependent counts.
async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InstitutionDetail>> {
    let summary = InstitutionRepository::new((*state.db).clone())
        .find_summary(id)
        .await?;

    let ctx = ResourceCtx::institution(id, summary.institution.allow_public_viewing);
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;

    Ok(Json(InstitutionDetail {
        institution: summary.institution,
        department_count: summary.department_count,
        project_count: summary.project_count,
        transaction_count: summary.transaction_count,
    }))
}

/// POST /institutions - Create an institution (admin only).
async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInstitutionRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    authz::authorize(
        &user.actor()?,
        Action::Create,
        &ResourceCtx::create_institution(),
    )?;

    let currency = match payload.currency.as_deref() {
        Some(code) => code
            .parse::<Currency>()
            .map_err(|e| ApiError(AppError::Validation(e)))?,
        None => Currency::default(),
    };

    let created = InstitutionRepository::new((*state.db).clone())
        .create(CreateInstitutionInput {
            name: payload.name,
            institution_type: payload.institution_type,
            description: payload.description,
            fiscal_year_start: payload.fiscal_year_start,
            fiscal_year_end: payload.fiscal_year_end,
            currency: currency.to_string(),
            allow_public_viewing: payload.allow_public_viewing,
            require_approval: payload.require_approval,
            address: payload.address,
            city: payload.city,
            country: payload.country,
            website: payload.website,
            contact_email: payload.contact_email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /institutions/{id} - Update institution settings.
async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInstitutionRequest>,
) -> ApiResult<Json<institutions::Model>> {
    payload.validate()?;

    let repo = InstitutionRepository::new((*state.db).clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {id}"))))?;

    let ctx = ResourceCtx::institution(id, existing.allow_public_viewing);
    authz::authorize(&user.actor()?, Action::Update, &ctx)?;

    let currency = payload
        .currency
        .as_deref()
        .map(str::parse::<Currency>)
        .transpose()
        .map_err(|e| ApiError(AppError::Validation(e)))?;

    let updated = repo
        .update(
            id,
            UpdateInstitutionInput {
                name: payload.name,
                description: payload.description,
                fiscal_year_start: payload.fiscal_year_start,
                fiscal_year_end: payload.fiscal_year_end,
                currency: currency.map(|c| c.to_string()),
                allow_public_viewing: payload.allow_public_viewing,
                require_approval: payload.require_approval,
                address: payload.address,
                city: payload.city,
                country: payload.country,
                website: payload.website,
                contact_email: payload.contact_email,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(updated))
}

/// DELETE /institutions/{id} - Atomic cascade delete (admin only).
async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = InstitutionRepository::new((*state.db).clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {id}"))))?;

    let ctx = ResourceCtx::institution(id, existing.allow_public_viewing);
    authz::authorize(&user.actor()?, Action::Delete, &ctx)?;

    repo.delete_cascade(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
