//! Admin dashboard summary and liveness check.

use std::sync::Arc;

use accounts_sdk::{AccountsApi, AccountsError};
use admin_api::response::{JsonBody, ok_json};
use admin_api::{ApiResult, Problem, WithRequestContext, problem};
use admin_security::{Authz, OperationStatus, log_operation};
use axum::extract::OriginalUri;
use axum::routing::get;
use axum::{Extension, Json, Router};
use master_data_sdk::{MasterDataApi, MasterDataError};
use serde::Serialize;

use crate::app::Services;

pub const DASHBOARD_PATH: &str = "/admin/v1/dashboard";
pub const HEALTH_PATH: &str = "/healthz";

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_users: u64,
    pub active_users: u64,
    pub master_data_records: u64,
}

#[derive(Clone)]
struct DashboardState {
    accounts: Arc<dyn AccountsApi>,
    master_data: Arc<dyn MasterDataApi>,
}

fn accounts_problem(e: &AccountsError) -> Problem {
    match e {
        AccountsError::PermissionDenied { .. } => {
            problem::forbidden("You do not have permission to access this area.")
                .with_code("DASHBOARD_PERMISSION_DENIED")
        }
        _ => problem::internal_error(e.to_string()).with_code("DASHBOARD_INTERNAL"),
    }
}

fn master_data_problem(e: &MasterDataError) -> Problem {
    match e {
        MasterDataError::PermissionDenied { .. } => {
            problem::forbidden("You do not have permission to access this area.")
                .with_code("DASHBOARD_PERMISSION_DENIED")
        }
        _ => problem::internal_error(e.to_string()).with_code("DASHBOARD_INTERNAL"),
    }
}

async fn dashboard(
    Authz(ctx): Authz,
    Extension(state): Extension<DashboardState>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<JsonBody<Dashboard>> {
    let stats = state
        .accounts
        .stats(&ctx)
        .await
        .map_err(|e| accounts_problem(&e).with_request_context(&uri))?;
    let master_data_records = state
        .master_data
        .count(&ctx)
        .await
        .map_err(|e| master_data_problem(&e).with_request_context(&uri))?;

    log_operation(
        "Dashboard Access",
        OperationStatus::Success,
        ctx.actor_id(),
        &serde_json::json!({
            "total_users": stats.total_users,
            "active_users": stats.active_users,
        }),
    );
    Ok(Json(Dashboard {
        total_users: stats.total_users,
        active_users: stats.active_users,
        master_data_records,
    }))
}

pub fn register_routes(router: Router, services: &Services) -> Router {
    let state = DashboardState {
        accounts: services.accounts.clone(),
        master_data: services.master_data.clone(),
    };
    router.route(
        DASHBOARD_PATH,
        get(dashboard).layer(Extension(state)),
    )
}

/// Liveness sits outside the auth layer.
pub fn register_health(router: Router) -> Router {
    router.route(
        HEALTH_PATH,
        get(|| async { ok_json(serde_json::json!({ "status": "ok" })) }),
    )
}
