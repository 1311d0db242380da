//! Authentication routes: register, login, current profile.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::auth::{hash_password, verify_password};
use fiscora_db::{UserRepository, entities::sea_orm_active_enums::UserRole, entities::users};
use fiscora_shared::AppError;
use fiscora_shared::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Creates the auth routes that require a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: fiscora_core::authz::UserRole::from(user.role)
            .as_str()
            .to_string(),
        institution_id: user.institution_id,
    }
}

fn auth_response(state: &AppState, user: &users::Model) -> ApiResult<AuthResponse> {
    let info = user_info(user);
    let token = state
        .jwt_service
        .generate_token(user.id, user.institution_id, &info.role)?;

    Ok(AuthResponse {
        token,
        expires_in: state.jwt_service.expires_in(),
        user: info,
    })
}

/// POST /auth/register - Create a viewer account and return a token.
///
/// Public registration always yields the `viewer` role; privileged roles
/// are seeded or assigned by an administrator.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    if let Some(requested) = &payload.role {
        if requested != "viewer" {
            return Err(ApiError(AppError::Forbidden(
                "privileged roles are assigned by an administrator".to_string(),
            )));
        }
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let password_hash = hash_password(&payload.password)?;
    let user = user_repo
        .create(
            &payload.email,
            &password_hash,
            &payload.full_name,
            UserRole::Viewer,
            payload.institution_id,
        )
        .await?;

    info!(user_id = %user.id, "user registered");

    let response = auth_response(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - Authenticate and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.validate()?;

    let invalid =
        || ApiError(AppError::Unauthenticated("Invalid email or password".to_string()));

    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(ApiError(AppError::Unauthenticated(
            "This account has been disabled".to_string(),
        )));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "failed login attempt");
        return Err(invalid());
    }

    Ok(Json(auth_response(&state, &user)?))
}

/// GET /auth/me - Current user profile.
async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<UserInfo>> {
    let model = UserRepository::new((*state.db).clone())
        .find_by_id(user.user_id())
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("user".to_string())))?;

    Ok(Json(user_info(&model)))
}
