// GET|POST /line-items/, GET|PUT|DELETE /line-items/:id

use axum::{extract::State, Extension};
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath, ApiQuery, Pagination};
use crate::auth::Principal;
use crate::database::models::{LineItem, LineItemCreate, LineItemUpdate};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::access::require_superuser;
use crate::services::{Listing, Message};
use crate::state::AppState;

/// Any authenticated caller may read the catalog
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<Pagination>,
) -> ApiResult<Listing<LineItem>> {
    let page = params.page(state.config.api.default_page_limit)?;
    Ok(ApiResponse::success(state.line_items().list(page).await?))
}

pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<LineItem> {
    Ok(ApiResponse::success(state.line_items().get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<ApiJson<LineItemCreate>, ApiError>,
) -> ApiResult<LineItem> {
    // Non-superusers are refused before the body is even looked at
    require_superuser(&principal)?;
    let ApiJson(input) = payload?;
    Ok(ApiResponse::success(state.line_items().create(&principal, input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<ApiJson<LineItemUpdate>, ApiError>,
) -> ApiResult<LineItem> {
    require_superuser(&principal)?;
    let ApiJson(patch) = payload?;
    Ok(ApiResponse::success(state.line_items().update(&principal, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    Ok(ApiResponse::success(state.line_items().delete(&principal, id).await?))
}
