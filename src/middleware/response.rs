use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Successful response body. Resources are returned bare with 200, without
/// an envelope; list endpoints return a `Listing` which carries its own
/// `{data, count}` shape.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self.data).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
