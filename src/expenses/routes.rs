use super::handlers;
use axum::{routing::get, Router};

/// Creates the expenses router with expense and participant routes
pub fn expenses_routes() -> Router {
    Router::new()
        .route(
            "/api/groups/:id/expenses",
            get(handlers::get_group_expenses).post(handlers::create_group_expense),
        )
        .route(
            "/api/expenses/:id",
            get(handlers::get_expense_by_id)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route(
            "/api/expenses/:id/participants",
            get(handlers::get_expense_participants).post(handlers::add_expense_participant),
        )
}
