use super::models::{AddMemberRequest, CreateGroupRequest, UpdateGroupRequest};
use super::services::GroupsService;
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

fn item_controls(group_id: &str) -> Controls {
    Controls::new()
        .with("self", Control::get(urls::group(group_id)))
        .with(
            "update",
            Control::put(urls::group(group_id), UpdateGroupRequest::schema()),
        )
        .with("delete", Control::delete(urls::group(group_id)))
        .with("members", Control::get(urls::group_members(group_id)))
        .with("expenses", Control::get(urls::group_expenses(group_id)))
        .with(
            "balances",
            Control::get(urls::group_balances(group_id)).with_title("Group balances"),
        )
}

// ============================================================================
// Group CRUD Handlers
// ============================================================================

/// GET /api/groups - List all groups (short form)
pub async fn get_groups(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    let groups = groups_service.list_groups().await?;

    let items: Vec<serde_json::Value> = groups
        .iter()
        .map(|group| {
            json!({
                "id": group.id,
                "name": group.name,
                "description": group.description,
                "created_by": group.created_by,
                "created_at": group.created_at,
                "updated_at": group.updated_at,
                "@controls": item_controls(&group.id),
            })
        })
        .collect();

    let controls = Controls::new()
        .with("self", Control::get(urls::groups()))
        .with(
            "create",
            Control::post(urls::groups(), CreateGroupRequest::schema()),
        );

    Ok(Json(json!({ "groups": items, "@controls": controls })))
}

/// POST /api/groups - Create a group; the creator becomes its admin
pub async fn create_group(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    let group = groups_service.create_group(&authed.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "group": group,
            "@controls": item_controls(&group.id),
        })),
    ))
}

/// GET /api/groups/:id - Group detail with members and expense ids
pub async fn get_group_by_id(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    let group = groups_service.get_group(&group_id).await?;
    let members = groups_service.list_members(&group.id).await?;
    let expense_ids = groups_service.expense_ids(&group.id).await?;

    Ok(Json(json!({
        "group": {
            "id": group.id,
            "name": group.name,
            "description": group.description,
            "created_by": group.created_by,
            "created_at": group.created_at,
            "updated_at": group.updated_at,
            "members": members,
            "expenses": expense_ids,
        },
        "@controls": item_controls(&group.id),
    })))
}

/// PUT /api/groups/:id - Update group details (admin only)
pub async fn update_group(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(group_id): Path<String>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    groups_service.get_group(&group_id).await?;
    groups_service.require_admin(&group_id, &authed.id).await?;

    let group = groups_service.update_group(&group_id, request).await?;

    Ok(Json(json!({
        "group": group,
        "@controls": item_controls(&group.id),
    })))
}

/// DELETE /api/groups/:id - Delete group (admin only; cascades)
pub async fn delete_group(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    groups_service.get_group(&group_id).await?;
    groups_service.require_admin(&group_id, &authed.id).await?;

    groups_service.delete_group(&group_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Membership Handlers
// ============================================================================

/// GET /api/groups/:id/members - List group members
pub async fn get_group_members(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    groups_service.get_group(&group_id).await?;
    let members = groups_service.list_members(&group_id).await?;

    let items: Vec<serde_json::Value> = members
        .iter()
        .map(|member| {
            json!({
                "id": member.id,
                "group_id": member.group_id,
                "user_id": member.user_id,
                "user_name": member.user_name,
                "role": member.role,
                "joined_at": member.joined_at,
                "@controls": Controls::new()
                    .with("user", Control::get(urls::user(&member.user_id)))
                    .with(
                        "delete",
                        Control::delete(urls::group_member(&group_id, &member.user_id)),
                    ),
            })
        })
        .collect();

    let controls = Controls::new()
        .with("self", Control::get(urls::group_members(&group_id)))
        .with("group", Control::get(urls::group(&group_id)))
        .with(
            "create",
            Control::post(urls::group_members(&group_id), AddMemberRequest::schema()),
        );

    Ok(Json(json!({ "members": items, "@controls": controls })))
}

/// POST /api/groups/:id/members - Add a member (admin only)
pub async fn add_group_member(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(group_id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    groups_service.get_group(&group_id).await?;
    groups_service.require_admin(&group_id, &authed.id).await?;

    let member = groups_service.add_member(&group_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "member": member,
            "@controls": Controls::new()
                .with("self", Control::get(urls::group_members(&group_id)))
                .with("user", Control::get(urls::user(&member.user_id)))
                .with(
                    "delete",
                    Control::delete(urls::group_member(&group_id, &member.user_id)),
                ),
        })),
    ))
}

/// DELETE /api/groups/:id/members/:user_id - Remove a member
///
/// Members can remove themselves; admins can remove anyone. Removing the
/// last admin is rejected.
pub async fn remove_group_member(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path((group_id, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());

    groups_service.get_group(&group_id).await?;

    if authed.id != user_id {
        groups_service.require_admin(&group_id, &authed.id).await?;
    }

    groups_service.remove_member(&group_id, &user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
