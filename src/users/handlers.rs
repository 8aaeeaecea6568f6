use super::models::{CreateUserRequest, UpdateUserRequest};
use super::services::UsersService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
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

fn item_controls(user_id: &str) -> Controls {
    Controls::new()
        .with("self", Control::get(urls::user(user_id)))
        .with(
            "update",
            Control::put(urls::user(user_id), UpdateUserRequest::schema()),
        )
        .with("delete", Control::delete(urls::user(user_id)))
}

/// GET /api/users - List all users (short form)
pub async fn get_users(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let users = users_service.list_users().await?;

    let items: Vec<serde_json::Value> = users
        .iter()
        .map(|user| {
            json!({
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "created_at": user.created_at,
                "updated_at": user.updated_at,
                "@controls": item_controls(&user.id),
            })
        })
        .collect();

    let controls = Controls::new()
        .with("self", Control::get(urls::users()))
        .with(
            "create",
            Control::post(urls::users(), CreateUserRequest::schema()).with_title("Sign up"),
        );

    Ok(Json(json!({ "users": items, "@controls": controls })))
}

/// POST /api/users - Sign up. Returns the user's API key exactly once.
pub async fn create_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let (user, api_key) = users_service.create_user(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": user,
            "api_key": api_key,
            "@controls": item_controls(&user.id),
        })),
    ))
}

/// GET /api/users/:id - User detail with group relations
pub async fn get_user_by_id(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service.get_user(&user_id).await?;
    let created_groups = users_service.created_group_ids(&user.id).await?;
    let group_memberships = users_service.membership_group_ids(&user.id).await?;

    Ok(Json(json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "created_at": user.created_at,
            "updated_at": user.updated_at,
            "created_groups": created_groups,
            "group_memberships": group_memberships,
        },
        "@controls": item_controls(&user.id),
    })))
}

/// PUT /api/users/:id - Update own account
pub async fn update_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if authed.id != user_id {
        return Err(ApiError::Forbidden(
            "You can only update your own account".to_string(),
        ));
    }

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service.update_user(&user_id, request).await?;

    Ok(Json(json!({
        "user": user,
        "@controls": item_controls(&user.id),
    })))
}

/// DELETE /api/users/:id - Delete own account
pub async fn delete_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if authed.id != user_id {
        return Err(ApiError::Forbidden(
            "You can only delete your own account".to_string(),
        ));
    }

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    users_service.delete_user(&user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
