//! Authentication Module
//! Mission: Password login, signed identity tokens and owner-only access

pub mod accounts;
pub mod api;
pub mod authenticator;
pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod user_store;

pub use accounts::AccountService;
pub use api::AuthState;
pub use authenticator::Authenticator;
pub use errors::{AuthError, RegistrationError, StoreError, TokenError};
pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use models::{AuthenticatedIdentity, User};
pub use password::PasswordHasher;
pub use policy::{AccessDecision, AccessPolicy};
pub use user_store::{CredentialStore, UserStore};
