//! Transaction routes: CRUD plus the approval workflow.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use fiscora_core::authz::{self, Action, ResourceCtx, ResourceKind};
use fiscora_core::workflow::{TransactionDraft, WorkflowService};
use fiscora_db::entities::{
    sea_orm_active_enums::{RecurringFrequency, TransactionStatus, TransactionType},
    transactions,
};
use fiscora_db::repositories::{
    CreateTransactionInput, InstitutionRepository, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
use fiscora_shared::AppError;
use fiscora_shared::types::{PageRequest, PageResponse};

/// Creates the transaction router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list).post(create))
        .route(
            "/transactions/{id}",
            get(get_one).put(update).delete(delete),
        )
        .route("/transactions/{id}/approve", put(approve))
        .route("/transactions/{id}/reject", put(reject))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    /// Admin only; non-admins are always scoped to their own institution.
    institution_id: Option<Uuid>,
    #[serde(rename = "type")]
    transaction_type: Option<TransactionType>,
    status: Option<TransactionStatus>,
    department_id: Option<Uuid>,
    project_id: Option<Uuid>,
    category: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CreateTransactionRequest {
    /// Defaults to the caller's institution.
    institution_id: Option<Uuid>,
    department_id: Option<Uuid>,
    project_id: Option<Uuid>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    amount: Decimal,
    currency: Option<String>,
    category: String,
    description: String,
    vendor_name: Option<String>,
    vendor_contact: Option<String>,
    reference: Option<String>,
    transaction_date: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
    attachments: Option<serde_json::Value>,
    #[serde(default)]
    is_recurring: bool,
    recurring_frequency: Option<RecurringFrequency>,
    recurring_next_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct UpdateTransactionRequest {
    amount: Option<Decimal>,
    category: Option<String>,
    description: Option<String>,
    vendor_name: Option<Option<String>>,
    vendor_contact: Option<Option<String>>,
    reference: Option<Option<String>>,
    transaction_date: Option<DateTime<Utc>>,
    tags: Option<Vec<String>>,
    attachments: Option<serde_json::Value>,
}

/// Overlays an update payload on the stored row for re-validation.
fn merged_draft<'a>(
    existing: &'a transactions::Model,
    payload: &'a UpdateTransactionRequest,
) -> TransactionDraft<'a> {
    TransactionDraft {
        amount: payload.amount.unwrap_or(existing.amount),
        category: payload.category.as_deref().unwrap_or(&existing.category),
        description: payload
            .description
            .as_deref()
            .unwrap_or(&existing.description),
    }
}

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
) -> ApiResult<(transactions::Model, ResourceCtx)> {
    let transaction = TransactionRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("transaction {id}"))))?;

    let inst_public = institution_public(state, transaction.institution_id).await?;
    let ctx = ResourceCtx::transaction(
        transaction.institution_id,
        transaction.created_by,
        transaction.status.into(),
        inst_public,
    );
    Ok((transaction, ctx))
}

/// GET /transactions - Filtered, paginated listing. Non-admins only ever
/// see their own institution.
async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<transactions::Model>>> {
    let institution_scope = if user.is_admin() {
        query.institution_id
    } else {
        let home = user.institution_id().ok_or_else(|| {
            ApiError(AppError::Forbidden(
                "account is not attached to an institution".into(),
            ))
        })?;
        Some(home)
    };

    let filter = TransactionFilter {
        transaction_type: query.transaction_type,
        status: query.status,
        department_id: query.department_id,
        project_id: query.project_id,
        category: query.category,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let (items, total) = TransactionRepository::new((*state.db).clone())
        .list(institution_scope, &filter, &page)
        .await?;

    Ok(Json(PageResponse::new(
        items,
        page.page,
        page.clamped_limit(),
        total,
    )))
}

/// GET /transactions/{id} - One transaction.
async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<transactions::Model>> {
    let (transaction, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Read, &ctx)?;
    Ok(Json(transaction))
}

/// POST /transactions - Create a pending transaction. Expense amounts are
/// debited against the referenced department/project budgets immediately.
async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    WorkflowService::validate_draft(&TransactionDraft {
        amount: payload.amount,
        category: &payload.category,
        description: &payload.description,
    })?;

    let institution_id = payload
        .institution_id
        .or(user.institution_id())
        .ok_or_else(|| {
            ApiError(AppError::Validation(
                "institution_id is required".into(),
            ))
        })?;

    let ctx = ResourceCtx::new_resource(ResourceKind::Transaction, institution_id);
    authz::authorize(&user.actor()?, Action::Create, &ctx)?;

    let institution = InstitutionRepository::new((*state.db).clone())
        .find_by_id(institution_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("institution {institution_id}"))))?;

    let created = TransactionRepository::new((*state.db).clone())
        .create(CreateTransactionInput {
            institution_id,
            department_id: payload.department_id,
            project_id: payload.project_id,
            transaction_type: payload.transaction_type,
            amount: payload.amount,
            currency: payload.currency.unwrap_or(institution.currency),
            category: payload.category,
            description: payload.description,
            vendor_name: payload.vendor_name,
            vendor_contact: payload.vendor_contact,
            reference: payload.reference,
            transaction_date: payload.transaction_date,
            created_by: user.user_id(),
            attachments: payload.attachments.unwrap_or_else(|| serde_json::json!([])),
            tags: payload.tags,
            is_recurring: payload.is_recurring,
            recurring_frequency: payload.recurring_frequency,
            recurring_next_date: payload.recurring_next_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /transactions/{id} - Update a pending transaction. Amount changes
/// never re-touch the budget ledger.
async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> ApiResult<Json<transactions::Model>> {
    let (transaction, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Update, &ctx)?;
    WorkflowService::ensure_editable(transaction.status.into())?;

    // Changed fields are held to the same minimums as at creation.
    WorkflowService::validate_draft(&merged_draft(&transaction, &payload))?;

    let updated = TransactionRepository::new((*state.db).clone())
        .update(
            id,
            UpdateTransactionInput {
                amount: payload.amount,
                category: payload.category,
                description: payload.description,
                vendor_name: payload.vendor_name,
                vendor_contact: payload.vendor_contact,
                reference: payload.reference,
                transaction_date: payload.transaction_date,
                tags: payload.tags,
                attachments: payload.attachments,
            },
        )
        .await?;

    Ok(Json(updated))
}

/// PUT /transactions/{id}/approve - Approve a pending transaction.
async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<transactions::Model>> {
    let (transaction, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Approve, &ctx)?;
    WorkflowService::approve(transaction.status.into(), user.user_id())?;

    // The repository re-checks `pending` with a compare-and-set, so a
    // concurrent decision loses cleanly even after this check passed.
    let approved = TransactionRepository::new((*state.db).clone())
        .approve(id, user.user_id())
        .await?;

    Ok(Json(approved))
}

/// PUT /transactions/{id}/reject - Reject a pending transaction. The
/// ledger debit from creation stays in place.
async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<transactions::Model>> {
    let (transaction, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Reject, &ctx)?;
    WorkflowService::reject(transaction.status.into(), user.user_id())?;

    let rejected = TransactionRepository::new((*state.db).clone())
        .reject(id, user.user_id())
        .await?;

    Ok(Json(rejected))
}

/// DELETE /transactions/{id} - Delete a pending transaction.
async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let (transaction, ctx) = load_with_ctx(&state, id).await?;
    authz::authorize(&user.actor()?, Action::Delete, &ctx)?;
    WorkflowService::ensure_deletable(transaction.status.into())?;

    TransactionRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscora_core::workflow::WorkflowError;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn stored_transaction() -> transactions::Model {
        let now = Utc::now().into();
        transactions::Model {
            id: Uuid::now_v7(),
            institution_id: Uuid::now_v7(),
            department_id: None,
            project_id: None,
            transaction_type: TransactionType::Expense,
            amount: dec!(500),
            currency: "USD".to_string(),
            category: "supplies".to_string(),
            description: "Office supplies for Q3".to_string(),
            vendor_name: None,
            vendor_contact: None,
            reference: None,
            transaction_date: now,
            status: TransactionStatus::Pending,
            created_by: Uuid::now_v7(),
            approved_by: None,
            approved_at: None,
            attachments: json!([]),
            tags: json!([]),
            is_recurring: false,
            recurring_frequency: None,
            recurring_next_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn empty_update() -> UpdateTransactionRequest {
        UpdateTransactionRequest {
            amount: None,
            category: None,
            description: None,
            vendor_name: None,
            vendor_contact: None,
            reference: None,
            transaction_date: None,
            tags: None,
            attachments: None,
        }
    }

    #[test]
    fn test_update_cannot_shorten_category_below_minimum() {
        let existing = stored_transaction();
        let payload = UpdateTransactionRequest {
            category: Some("x".to_string()),
            ..empty_update()
        };

        let result = WorkflowService::validate_draft(&merged_draft(&existing, &payload));
        assert!(matches!(
            result,
            Err(WorkflowError::Validation {
                field: "category",
                ..
            })
        ));
    }

    #[test]
    fn test_update_cannot_shorten_description_below_minimum() {
        let existing = stored_transaction();
        let payload = UpdateTransactionRequest {
            description: Some("abc".to_string()),
            ..empty_update()
        };

        let result = WorkflowService::validate_draft(&merged_draft(&existing, &payload));
        assert!(matches!(
            result,
            Err(WorkflowError::Validation {
                field: "description",
                ..
            })
        ));
    }

    #[test]
    fn test_update_rejects_negative_amount() {
        let existing = stored_transaction();
        let payload = UpdateTransactionRequest {
            amount: Some(dec!(-1)),
            ..empty_update()
        };

        let result = WorkflowService::validate_draft(&merged_draft(&existing, &payload));
        assert!(matches!(
            result,
            Err(WorkflowError::Validation { field: "amount", .. })
        ));
    }

    #[test]
    fn test_update_with_untouched_fields_keeps_stored_values() {
        let existing = stored_transaction();
        let payload = UpdateTransactionRequest {
            amount: Some(dec!(750)),
            ..empty_update()
        };

        let draft = merged_draft(&existing, &payload);
        assert_eq!(draft.amount, dec!(750));
        assert_eq!(draft.category, "supplies");
        assert!(WorkflowService::validate_draft(&draft).is_ok());
    }
}
