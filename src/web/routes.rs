use super::api;
use super::handlers::{
    delete_group_handler, delete_identity_provider_handler, delete_role_handler,
    delete_user_handler, groups_handler, healthz_handler, identity_provider_handler,
    index_handler, profile_handler, roles_handler, update_identity_provider_handler,
    update_profile_handler,
};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(healthz_handler))
        // HTML screens (forms post back to the same resource)
        .route(
            "/users/{user_id}/profile",
            get(profile_handler).post(update_profile_handler),
        )
        .route("/users/{user_id}/delete", post(delete_user_handler))
        .route("/roles", get(roles_handler))
        .route("/roles/{id}/delete", post(delete_role_handler))
        .route("/groups", get(groups_handler))
        .route("/groups/{id}/delete", post(delete_group_handler))
        .route(
            "/identity-providers/{id}",
            get(identity_provider_handler).post(update_identity_provider_handler),
        )
        .route(
            "/identity-providers/{id}/delete",
            post(delete_identity_provider_handler),
        )
        // JSON API
        .route(
            "/api/users/{user_id}/profile",
            get(api::get_profile).patch(api::patch_profile),
        )
        .route("/api/roles", get(api::list_roles))
        .route("/api/groups", get(api::list_groups))
        .route(
            "/api/identity-providers/{id}",
            get(api::get_identity_provider)
                .patch(api::update_identity_provider)
                .delete(api::delete_identity_provider),
        )
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}
