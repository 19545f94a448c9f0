use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const BASE_PATH: &str = "/admin/v1/users";
pub const PROFILE_PATH: &str = "/admin/v1/profile";

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let users = Router::new()
        .route("/", get(handlers::list_users))
        .route("/stats", get(handlers::user_stats))
        .route("/{id}", get(handlers::get_user).patch(handlers::patch_user))
        .route("/{id}/toggle", post(handlers::toggle_user))
        .layer(Extension(service.clone()));

    let profile = Router::new()
        .route(
            "/",
            get(handlers::get_profile)
                .patch(handlers::patch_profile)
                .delete(handlers::delete_profile),
        )
        .layer(Extension(service));

    router.nest(BASE_PATH, users).nest(PROFILE_PATH, profile)
}
