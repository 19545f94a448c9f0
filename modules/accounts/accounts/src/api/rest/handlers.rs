use std::sync::Arc;

use accounts_sdk::{Account, AccountStats, Profile, ProfileUpdate};
use admin_api::{ApiResult, Page, PageRequest, response};
use admin_security::Authz;
use axum::{
    Json,
    extract::{Extension, OriginalUri, Path, Query},
    response::IntoResponse,
};

use crate::domain::service::Service;

use super::dto::{ListQuery, PatchUserRequest};
use super::error::domain_error_to_problem;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

pub async fn list_users(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<ListQuery>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Page<Account>>> {
    let page = PageRequest::normalized(query.page, query.per_page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let users = svc
        .list(&ctx, page)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(users))
}

pub async fn get_user(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Account>> {
    let user = svc
        .get(&ctx, id)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(user))
}

pub async fn patch_user(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    OriginalUri(uri): OriginalUri,
    Json(req): Json<PatchUserRequest>,
) -> ApiResult<Json<Account>> {
    let user = svc
        .update(&ctx, id, req.into())
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(user))
}

pub async fn toggle_user(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Account>> {
    let user = svc
        .toggle_active(&ctx, id)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(user))
}

pub async fn user_stats(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<AccountStats>> {
    let stats = svc
        .stats(&ctx)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(stats))
}

pub async fn get_profile(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Profile>> {
    let profile = svc
        .profile(&ctx)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(profile))
}

pub async fn patch_profile(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    let profile = svc
        .update_profile(&ctx, update)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(Json(profile))
}

pub async fn delete_profile(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<impl IntoResponse> {
    svc.delete_own_account(&ctx)
        .await
        .map_err(|e| domain_error_to_problem(&e, &uri))?;
    Ok(response::no_content())
}
