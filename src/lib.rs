pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{private, protected, public};
use crate::middleware::principal_middleware;
use crate::state::AppState;

/// Full application router: public endpoints at the root, resource
/// routers under the API prefix.
pub fn app(state: AppState) -> Router {
    let prefix = state.config.api.prefix.clone();
    let cors = cors_layer(&state.config.security);

    let mut api = resource_routes().route_layer(from_fn_with_state(state.clone(), principal_middleware));

    if state.config.environment.is_local() {
        api = api.merge(private_routes());
    }

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .nest(&prefix, api)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn resource_routes() -> Router<AppState> {
    use protected::{items, line_items, projects, users};

    Router::new()
        .route("/line-items/", get(line_items::list).post(line_items::create))
        .route(
            "/line-items/:id",
            get(line_items::get).put(line_items::update).delete(line_items::delete),
        )
        .route("/projects/", get(projects::list).post(projects::create))
        .route(
            "/projects/:id",
            get(projects::get).put(projects::update).delete(projects::delete),
        )
        .route("/items/", get(items::list).post(items::create))
        .route("/items/:id", get(items::get).put(items::update).delete(items::delete))
        .route("/users/", get(users::list).post(users::create))
        .route("/users/me", get(users::me))
        .route("/users/:id", get(users::get).patch(users::update).delete(users::delete))
}

fn private_routes() -> Router<AppState> {
    Router::new().route("/private/users/", post(private::create_user))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
