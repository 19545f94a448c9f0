use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use system_settings_sdk::SystemSettingsApi;

use crate::api::rest::handlers;

pub const BASE_PATH: &str = "/admin/v1/settings";

pub fn register_routes(router: Router, api: Arc<dyn SystemSettingsApi>) -> Router {
    let settings = Router::new()
        .route(
            "/",
            get(handlers::get_settings).patch(handlers::patch_settings),
        )
        .route("/restore", post(handlers::restore_settings))
        .route("/export", get(handlers::export_settings))
        .route("/backups", get(handlers::list_backups))
        .layer(Extension(api));

    router.nest(BASE_PATH, settings)
}
