use std::sync::Arc;

use admin_api::{ApiResult, Page, PageRequest, response};
use admin_security::Authz;
use axum::{
    Json,
    body::Bytes,
    extract::{Extension, OriginalUri, Path, Query},
    response::IntoResponse,
};
use master_data_sdk::{ImportBatchResult, MasterDataPatch, MasterDataRecord, NewMasterData};

use crate::config::MasterDataConfig;
use crate::domain::service::Service;

use super::dto::{DeleteAllQuery, DeleteAllResponse, ListQuery};
use super::error::domain_error_to_problem;

pub async fn list_master_data(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Extension(config): Extension<MasterDataConfig>,
    Query(query): Query<ListQuery>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Page<MasterDataRecord>>> {
    let page = PageRequest::normalized(
        query.page,
        query.per_page,
        config.page_size,
        config.max_page_size,
    );
    let records = svc
        .list(&ctx, query.category.as_deref(), page)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(records))
}

pub async fn list_categories(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<String>>> {
    let categories = svc
        .categories(&ctx)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(categories))
}

pub async fn get_master_data(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<MasterDataRecord>> {
    let record = svc
        .get(&ctx, id)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(record))
}

pub async fn create_master_data(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Json(req): Json<NewMasterData>,
) -> ApiResult<impl IntoResponse> {
    let record = svc
        .create(&ctx, req)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    let id = record.id.to_string();
    Ok(response::created_json(record, &uri, &id))
}

pub async fn patch_master_data(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    OriginalUri(uri): OriginalUri,
    Json(patch): Json<MasterDataPatch>,
) -> ApiResult<Json<MasterDataRecord>> {
    let record = svc
        .update(&ctx, id, patch)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(record))
}

pub async fn delete_master_data(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<impl IntoResponse> {
    svc.delete(&ctx, id)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(response::no_content())
}

/// `POST /import` with a raw `text/csv` body.
pub async fn import_master_data(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> ApiResult<Json<ImportBatchResult>> {
    let result = svc
        .import_csv(&ctx, &body)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(result))
}

pub async fn delete_all_master_data(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<DeleteAllQuery>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<DeleteAllResponse>> {
    let count = svc
        .delete_all(&ctx, query.confirm)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(DeleteAllResponse {
        count,
        deleted: query.confirm,
    }))
}
