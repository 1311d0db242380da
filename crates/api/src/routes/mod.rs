//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod departments;
pub mod health;
pub mod institutions;
pub mod projects;
pub mod reports;
pub mod transactions;

/// Creates the API router: public routes plus JWT-protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(institutions::routes())
        .merge(departments::routes())
        .merge(projects::routes())
        .merge(transactions::routes())
        .merge(budgets::routes())
        .merge(reports::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
