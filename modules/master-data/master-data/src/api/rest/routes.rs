use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::api::rest::handlers;
use crate::config::MasterDataConfig;
use crate::domain::service::Service;

pub const BASE_PATH: &str = "/admin/v1/master-data";

pub fn register_routes(router: Router, service: Arc<Service>, config: MasterDataConfig) -> Router {
    let master_data = Router::new()
        .route(
            "/",
            get(handlers::list_master_data)
                .post(handlers::create_master_data)
                .delete(handlers::delete_all_master_data),
        )
        .route("/categories", get(handlers::list_categories))
        .route("/import", post(handlers::import_master_data))
        .route(
            "/{id}",
            get(handlers::get_master_data)
                .patch(handlers::patch_master_data)
                .delete(handlers::delete_master_data),
        )
        .layer(Extension(service))
        .layer(Extension(config));

    router.nest(BASE_PATH, master_data)
}
