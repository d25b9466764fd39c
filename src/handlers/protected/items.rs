// GET|POST /items/, GET|PUT|DELETE /items/:id

use axum::{extract::State, Extension};
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath, ApiQuery, Pagination};
use crate::auth::Principal;
use crate::database::models::{Item, ItemCreate, ItemUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Listing, Message};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(params): ApiQuery<Pagination>,
) -> ApiResult<Listing<Item>> {
    let page = params.page(state.config.api.default_page_limit)?;
    Ok(ApiResponse::success(state.items().list(&principal, page).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Item> {
    Ok(ApiResponse::success(state.items().get(&principal, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(input): ApiJson<ItemCreate>,
) -> ApiResult<Item> {
    Ok(ApiResponse::success(state.items().create(&principal, input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ItemUpdate>,
) -> ApiResult<Item> {
    Ok(ApiResponse::success(state.items().update(&principal, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    Ok(ApiResponse::success(state.items().delete(&principal, id).await?))
}
