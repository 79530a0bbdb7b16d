//! Authentication Middleware
//! Mission: Protect API endpoints with bearer token validation

use crate::api::response::ApiResponse;
use crate::auth::{authenticator::Authenticator, models::AuthenticatedIdentity};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;
use tracing::warn;

/// Auth middleware that validates bearer tokens
pub async fn auth_middleware(
    State(authenticator): State<Arc<Authenticator>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::MissingToken)?;

    let identity = authenticator
        .resolve_identity(bearer.token())
        .map_err(|e| {
            warn!(path = %req.uri().path(), "Rejected bearer token: {}", e);
            AuthError::InvalidToken
        })?;

    // Add identity to request extensions so handlers can access it
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Extract identity from request (use after auth middleware)
pub fn extract_identity(req: &Request) -> Option<&AuthenticatedIdentity> {
    req.extensions().get::<AuthenticatedIdentity>()
}

/// Auth error types.
///
/// Every token failure collapses into `InvalidToken` so clients never learn
/// which check rejected them.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (StatusCode::UNAUTHORIZED, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
