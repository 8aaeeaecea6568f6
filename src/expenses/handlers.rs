use super::models::{
    AddParticipantRequest, CreateExpenseRequest, UpdateExpenseRequest,
};
use super::services::ExpensesService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::groups::services::GroupsService;
use crate::hypermedia::{urls, Control, Controls};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

fn item_controls(expense: &super::models::Expense) -> Controls {
    Controls::new()
        .with("self", Control::get(urls::expense(&expense.id)))
        .with(
            "update",
            Control::put(urls::expense(&expense.id), UpdateExpenseRequest::schema()),
        )
        .with("delete", Control::delete(urls::expense(&expense.id)))
        .with(
            "participants",
            Control::get(urls::expense_participants(&expense.id)),
        )
        .with("group", Control::get(urls::group(&expense.group_id)))
}

// ============================================================================
// Expense CRUD Handlers
// ============================================================================

/// GET /api/groups/:id/expenses - List a group's expenses
pub async fn get_group_expenses(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());
    let expenses_service = ExpensesService::new(app_state.db.clone());

    groups_service.get_group(&group_id).await?;
    let expenses = expenses_service.list_by_group(&group_id).await?;

    let items: Vec<serde_json::Value> = expenses
        .iter()
        .map(|expense| {
            json!({
                "id": expense.id,
                "group_id": expense.group_id,
                "created_by": expense.created_by,
                "amount": crate::common::cents_to_amount(expense.amount_cents),
                "description": expense.description,
                "category": expense.category,
                "created_at": expense.created_at,
                "updated_at": expense.updated_at,
                "@controls": item_controls(expense),
            })
        })
        .collect();

    let controls = Controls::new()
        .with("self", Control::get(urls::group_expenses(&group_id)))
        .with("group", Control::get(urls::group(&group_id)))
        .with(
            "balances",
            Control::get(urls::group_balances(&group_id)).with_title("Group balances"),
        )
        .with(
            "create",
            Control::post(urls::group_expenses(&group_id), CreateExpenseRequest::schema()),
        );

    Ok(Json(json!({ "expenses": items, "@controls": controls })))
}

/// POST /api/groups/:id/expenses - Record an expense (members only)
pub async fn create_group_expense(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(group_id): Path<String>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());
    let expenses_service = ExpensesService::new(app_state.db.clone());

    groups_service.get_group(&group_id).await?;
    groups_service.require_member(&group_id, &authed.id).await?;

    let expense = expenses_service
        .create_expense(&group_id, &authed.id, request)
        .await?;
    let participants = expenses_service.list_participants(&expense.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "expense": expense,
            "participants": participants,
            "@controls": item_controls(&expense),
        })),
    ))
}

/// GET /api/expenses/:id - Expense detail with participant rows
pub async fn get_expense_by_id(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(expense_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let expenses_service = ExpensesService::new(app_state.db.clone());

    let expense = expenses_service.get_expense(&expense_id).await?;
    let participants = expenses_service.list_participants(&expense_id).await?;

    Ok(Json(json!({
        "expense": expense,
        "participants": participants,
        "@controls": item_controls(&expense),
    })))
}

/// PUT /api/expenses/:id - Update an expense (creator only)
pub async fn update_expense(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(expense_id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let expenses_service = ExpensesService::new(app_state.db.clone());

    let expense = expenses_service.get_expense(&expense_id).await?;
    if expense.created_by != authed.id {
        return Err(ApiError::Forbidden(
            "Only the expense creator can update it".to_string(),
        ));
    }

    let expense = expenses_service.update_expense(&expense_id, request).await?;
    let participants = expenses_service.list_participants(&expense_id).await?;

    Ok(Json(json!({
        "expense": expense,
        "participants": participants,
        "@controls": item_controls(&expense),
    })))
}

/// DELETE /api/expenses/:id - Delete an expense (creator or group admin)
pub async fn delete_expense(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(expense_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());
    let expenses_service = ExpensesService::new(app_state.db.clone());

    let expense = expenses_service.get_expense(&expense_id).await?;
    if expense.created_by != authed.id {
        groups_service
            .require_admin(&expense.group_id, &authed.id)
            .await?;
    }

    expenses_service.delete_expense(&expense_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Participant Handlers
// ============================================================================

/// GET /api/expenses/:id/participants - List an expense's participants
pub async fn get_expense_participants(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(expense_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let expenses_service = ExpensesService::new(app_state.db.clone());

    let expense = expenses_service.get_expense(&expense_id).await?;
    let participants = expenses_service.list_participants(&expense_id).await?;

    let controls = Controls::new()
        .with("self", Control::get(urls::expense_participants(&expense_id)))
        .with("expense", Control::get(urls::expense(&expense_id)))
        .with("group", Control::get(urls::group(&expense.group_id)))
        .with(
            "create",
            Control::post(
                urls::expense_participants(&expense_id),
                AddParticipantRequest::schema(),
            ),
        );

    Ok(Json(json!({ "participants": participants, "@controls": controls })))
}

/// POST /api/expenses/:id/participants - Add a participant (creator only)
pub async fn add_expense_participant(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(expense_id): Path<String>,
    Json(request): Json<AddParticipantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let expenses_service = ExpensesService::new(app_state.db.clone());

    let expense = expenses_service.get_expense(&expense_id).await?;
    if expense.created_by != authed.id {
        return Err(ApiError::Forbidden(
            "Only the expense creator can add participants".to_string(),
        ));
    }

    let participant = expenses_service.add_participant(&expense_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "participant": participant,
            "@controls": Controls::new()
                .with("self", Control::get(urls::expense_participants(&expense_id)))
                .with("expense", Control::get(urls::expense(&expense_id)))
                .with("user", Control::get(urls::user(&participant.user_id))),
        })),
    ))
}
