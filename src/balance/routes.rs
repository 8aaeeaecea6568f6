use super::handlers;
use axum::{routing::get, Router};

/// Creates the balance router
pub fn balance_routes() -> Router {
    Router::new().route(
        "/api/groups/:id/balances",
        get(handlers::get_group_balances),
    )
}
