use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::engine;
use super::models::{ExpenseRecord, Member, ParticipantRecord};
use crate::common::{ApiError, AppState};
use crate::expenses::services::ExpensesService;
use crate::groups::services::GroupsService;
use crate::hypermedia::{urls, Control, Controls};

/// GET /api/groups/:id/balances - Net balances and settling transfers
pub async fn get_group_balances(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let groups_service = GroupsService::new(app_state.db.clone());
    let expenses_service = ExpensesService::new(app_state.db.clone());

    let group = groups_service.get_group(&group_id).await?;

    let members: Vec<Member> = groups_service
        .list_members(&group.id)
        .await?
        .into_iter()
        .map(|m| Member {
            user_id: m.user_id,
            user_name: m.user_name,
        })
        .collect();

    let expenses: Vec<ExpenseRecord> = expenses_service
        .list_with_participants(&group.id)
        .await?
        .into_iter()
        .map(|(_, participants)| ExpenseRecord {
            participants: participants
                .into_iter()
                .map(|p| ParticipantRecord {
                    user_id: p.user_id,
                    share_cents: p.share_cents,
                    paid_cents: p.paid_cents,
                })
                .collect(),
        })
        .collect();

    let report = engine::compute(&members, &expenses);

    let controls = Controls::new()
        .with("self", Control::get(urls::group_balances(&group.id)))
        .with("group", Control::get(urls::group(&group.id)))
        .with("expenses", Control::get(urls::group_expenses(&group.id)));

    Ok(Json(json!({
        "group_id": group.id,
        "balances": report.balances,
        "transfers": report.transfers,
        "@controls": controls,
    })))
}
