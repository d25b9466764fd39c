// handlers/private/mod.rs - Local-only seeding endpoints
//
// Mounted only when the environment is `local`; never authenticated.

use axum::extract::State;

use crate::api::ApiJson;
use crate::database::models::{User, UserCreate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /private/users/
pub async fn create_user(State(state): State<AppState>, ApiJson(input): ApiJson<UserCreate>) -> ApiResult<User> {
    let user = state.users().register(input).await?;
    Ok(ApiResponse::success(user))
}
