use super::handlers;
use axum::{
    routing::{delete, get},
    Router,
};

/// Creates the groups router with group and membership routes
pub fn groups_routes() -> Router {
    Router::new()
        .route(
            "/api/groups",
            get(handlers::get_groups).post(handlers::create_group),
        )
        .route(
            "/api/groups/:id",
            get(handlers::get_group_by_id)
                .put(handlers::update_group)
                .delete(handlers::delete_group),
        )
        .route(
            "/api/groups/:id/members",
            get(handlers::get_group_members).post(handlers::add_group_member),
        )
        .route(
            "/api/groups/:id/members/:user_id",
            delete(handlers::remove_group_member),
        )
}
