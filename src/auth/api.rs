//! Authentication API Endpoints
//! Mission: Provide login, registration and owner-only profile endpoints

use crate::api::response::ApiResponse;
use crate::auth::{
    accounts::AccountService,
    authenticator::Authenticator,
    errors::{AuthError, RegistrationError, StoreError},
    models::{
        AuthenticatedIdentity, IdentityResponse, LoginRequest, LoginResponse, RegisterRequest,
        UserResponse,
    },
    policy::AccessPolicy,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<Authenticator>,
    pub accounts: Arc<AccountService>,
}

impl AuthState {
    pub fn new(authenticator: Arc<Authenticator>, accounts: Arc<AccountService>) -> Self {
        Self {
            authenticator,
            accounts,
        }
    }
}

/// Login endpoint - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AuthApiError> {
    info!("🔐 Login attempt: {}", payload.email);

    // bcrypt is CPU-bound; keep it off the async workers
    let authenticator = state.authenticator.clone();
    let LoginRequest { email, password } = payload;
    let outcome = tokio::task::spawn_blocking(move || authenticator.authenticate(&email, &password))
        .await
        .map_err(|e| {
            error!("Login task failed: {}", e);
            AuthApiError::InternalError
        })??;

    let user = state
        .accounts
        .get_by_id(&outcome.subject_id)
        .map_err(store_failure)?
        .ok_or(AuthApiError::InternalError)?;

    info!("✅ Login successful: {} ({})", user.email, user.id);

    Ok(Json(ApiResponse::success(
        "Login successful",
        LoginResponse {
            token: outcome.token,
            expires_at: outcome.expires_at,
            user: UserResponse::from_user(&user),
        },
    )))
}

/// Registration endpoint - POST /api/v1/users/register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AuthApiError> {
    let accounts = state.accounts.clone();
    let user = tokio::task::spawn_blocking(move || accounts.register(payload))
        .await
        .map_err(|e| {
            error!("Registration task failed: {}", e);
            AuthApiError::InternalError
        })??;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "User registered successfully",
            UserResponse::from_user(&user),
        )),
    ))
}

/// Get current identity - GET /api/v1/auth/me
/// Built from the token alone, no database lookup
pub async fn get_current_user(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Json<ApiResponse<IdentityResponse>> {
    Json(ApiResponse::success(
        "Authenticated",
        IdentityResponse::from(&identity),
    ))
}

/// Users liveness - GET /api/v1/users/health
pub async fn users_health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success(
        "MediaVault API is running!",
        "Server is healthy",
    ))
}

/// Get user by id - GET /api/v1/users/:user_id (owner only)
pub async fn get_user_by_id(
    State(state): State<AuthState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AuthApiError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AuthApiError::InvalidUserId);
    }
    let uuid = Uuid::parse_str(user_id).map_err(|_| AuthApiError::InvalidUserId)?;

    // Ownership is checked before existence so foreign ids reveal nothing
    let decision = AccessPolicy::decide_by_id(&identity, &uuid);
    if !decision.allowed {
        warn!(
            subject = %identity.subject_id,
            requested = %uuid,
            reason = decision.denied_reason.unwrap_or_default(),
            "Access denied"
        );
        return Err(AuthApiError::Forbidden);
    }

    let user = state
        .accounts
        .get_by_id(&uuid)
        .map_err(store_failure)?
        .ok_or(AuthApiError::UserNotFound)?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        UserResponse::from_user(&user),
    )))
}

/// Get user by email - GET /api/v1/users/email/:email (owner only)
pub async fn get_user_by_email(
    State(state): State<AuthState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AuthApiError> {
    if email.trim().is_empty() {
        return Err(AuthApiError::EmptyEmail);
    }

    let decision = AccessPolicy::decide_by_email(&identity, &email);
    if !decision.allowed {
        warn!(
            subject = %identity.subject_id,
            reason = decision.denied_reason.unwrap_or_default(),
            "Access denied"
        );
        return Err(AuthApiError::Forbidden);
    }

    let user = state
        .accounts
        .get_by_email(&email)
        .map_err(store_failure)?
        .ok_or(AuthApiError::UserNotFound)?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        UserResponse::from_user(&user),
    )))
}

fn store_failure(e: StoreError) -> AuthApiError {
    error!("Credential store failure: {}", e);
    AuthApiError::InternalError
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    Forbidden,
    UserNotFound,
    UserAlreadyExists,
    InvalidInput(&'static str),
    InvalidUserId,
    EmptyEmail,
    InternalError,
}

impl From<AuthError> for AuthApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AuthenticationFailed => AuthApiError::InvalidCredentials,
            other => {
                error!("Login failed internally: {}", other);
                AuthApiError::InternalError
            }
        }
    }
}

impl From<RegistrationError> for AuthApiError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::InvalidInput(message) => AuthApiError::InvalidInput(message),
            RegistrationError::EmailTaken => AuthApiError::UserAlreadyExists,
            other => {
                error!("Registration failed internally: {}", other);
                AuthApiError::InternalError
            }
        }
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AuthApiError::Forbidden => (StatusCode::FORBIDDEN, "Access denied"),
            AuthApiError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AuthApiError::UserAlreadyExists => {
                (StatusCode::CONFLICT, "User with this email already exists")
            }
            AuthApiError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            AuthApiError::InvalidUserId => (StatusCode::BAD_REQUEST, "Invalid user ID format"),
            AuthApiError::EmptyEmail => (StatusCode::BAD_REQUEST, "Email cannot be empty"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
