use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::health;
use crate::auth::{api as auth_api, auth_middleware, AuthState};
use crate::middleware::request_logging;

/// Create the API router
pub fn create_router(state: AuthState) -> Router {
    // Health probes
    let health_routes = Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/health/ping", get(health::ping))
        .route("/api/v1/health/info", get(health::info));

    // Login and registration
    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(auth_api::login))
        .route("/api/v1/users/register", post(auth_api::register))
        .route("/api/v1/users/health", get(auth_api::users_health))
        .with_state(state.clone());

    // Bearer token required
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth_api::get_current_user))
        .route("/api/v1/users/:user_id", get(auth_api::get_user_by_id))
        .route(
            "/api/v1/users/email/:email",
            get(auth_api::get_user_by_email),
        )
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}
