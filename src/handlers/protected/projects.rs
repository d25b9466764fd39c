// GET|POST /projects/, GET|PUT|DELETE /projects/:id

use axum::{extract::State, Extension};
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath, ApiQuery, Pagination};
use crate::auth::Principal;
use crate::database::models::{Project, ProjectCreate, ProjectUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Listing, Message};
use crate::state::AppState;

/// Superusers list everything, others only their own
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(params): ApiQuery<Pagination>,
) -> ApiResult<Listing<Project>> {
    let page = params.page(state.config.api.default_page_limit)?;
    Ok(ApiResponse::success(state.projects().list(&principal, page).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Project> {
    Ok(ApiResponse::success(state.projects().get(&principal, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(input): ApiJson<ProjectCreate>,
) -> ApiResult<Project> {
    Ok(ApiResponse::success(state.projects().create(&principal, input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ProjectUpdate>,
) -> ApiResult<Project> {
    Ok(ApiResponse::success(state.projects().update(&principal, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    Ok(ApiResponse::success(state.projects().delete(&principal, id).await?))
}
