use std::sync::Arc;

use admin_api::{ApiResult, response};
use admin_security::Authz;
use axum::{
    Json,
    body::Bytes,
    extract::{Extension, OriginalUri},
    http::HeaderMap,
    response::Response,
};
use system_settings_sdk::{
    BackupInfo, ConfigDocument, ConfigPatch, RestoreOutcome, SystemSettingsApi,
};

use super::error::settings_error_to_problem;

/// Header carrying the original name of an uploaded restore file.
pub const FILENAME_HEADER: &str = "x-filename";

pub async fn get_settings(
    Authz(ctx): Authz,
    Extension(api): Extension<Arc<dyn SystemSettingsApi>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<ConfigDocument>> {
    let doc = api
        .load(&ctx)
        .await
        .map_err(|e| settings_error_to_problem(&e, &uri))?;
    Ok(Json(doc))
}

pub async fn patch_settings(
    Authz(ctx): Authz,
    Extension(api): Extension<Arc<dyn SystemSettingsApi>>,
    OriginalUri(uri): OriginalUri,
    Json(patch): Json<ConfigPatch>,
) -> ApiResult<Json<ConfigDocument>> {
    let doc = api
        .update(&ctx, patch)
        .await
        .map_err(|e| settings_error_to_problem(&e, &uri))?;
    Ok(Json(doc))
}

pub async fn restore_settings(
    Authz(ctx): Authz,
    Extension(api): Extension<Arc<dyn SystemSettingsApi>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<RestoreOutcome>> {
    let source_name = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let outcome = api
        .restore(&ctx, body.to_vec(), source_name)
        .await
        .map_err(|e| settings_error_to_problem(&e, &uri))?;
    Ok(Json(outcome))
}

pub async fn export_settings(
    Authz(ctx): Authz,
    Extension(api): Extension<Arc<dyn SystemSettingsApi>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Response> {
    let exported = api
        .export_backup(&ctx)
        .await
        .map_err(|e| settings_error_to_problem(&e, &uri))?;
    Ok(response::attachment(
        exported.bytes,
        "application/json",
        &exported.file_name,
    ))
}

pub async fn list_backups(
    Authz(ctx): Authz,
    Extension(api): Extension<Arc<dyn SystemSettingsApi>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<BackupInfo>>> {
    let backups = api
        .list_backups(&ctx)
        .await
        .map_err(|e| settings_error_to_problem(&e, &uri))?;
    Ok(Json(backups))
}
