use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_token, Principal};
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the bearer token to a `Principal` and injects it into the
/// request. Handlers behind this layer read it with `Extension<Principal>`.
pub async fn principal_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)
        .map_err(|msg| {
            tracing::debug!("Rejected request: {}", msg);
            ApiError::forbidden("Could not validate credentials")
        })?;

    let claims = decode_token(&state.config.security, token)?;
    let user_id = claims.user_id()?;

    let user = state
        .repos
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {}", user_id);
            ApiError::not_found("User not found")
        })?;

    if !user.is_active {
        tracing::warn!("Inactive user {} attempted access", user_id);
        return Err(ApiError::bad_request("Inactive user"));
    }

    let principal = Principal::from(&user);
    tracing::debug!(user_id = %principal.id, superuser = principal.is_superuser, "principal resolved");

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Ok("abc.def"));
        assert!(extract_bearer(&headers("Bearer   ")).is_err());
        assert!(extract_bearer(&headers("Basic xyz")).is_err());
        assert!(extract_bearer(&HeaderMap::new()).is_err());
    }
}
