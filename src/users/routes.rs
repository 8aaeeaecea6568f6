use super::handlers;
use axum::{routing::get, Router};

/// Creates the users router
pub fn users_routes() -> Router {
    Router::new()
        .route(
            "/api/users",
            get(handlers::get_users).post(handlers::create_user),
        )
        .route(
            "/api/users/:id",
            get(handlers::get_user_by_id)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
}
