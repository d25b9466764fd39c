// GET|POST /users/, GET /users/me, GET|PATCH|DELETE /users/:id

use axum::{extract::State, Extension};
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath, ApiQuery, Pagination};
use crate::auth::Principal;
use crate::database::models::{User, UserCreate, UserUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Listing, Message};
use crate::state::AppState;

pub async fn me(State(state): State<AppState>, Extension(principal): Extension<Principal>) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users().me(&principal).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(params): ApiQuery<Pagination>,
) -> ApiResult<Listing<User>> {
    let page = params.page(state.config.api.default_page_limit)?;
    Ok(ApiResponse::success(state.users().list(&principal, page).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users().get(&principal, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(input): ApiJson<UserCreate>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users().create(&principal, input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<UserUpdate>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users().update(&principal, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    Ok(ApiResponse::success(state.users().delete(&principal, id).await?))
}
