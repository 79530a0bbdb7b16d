//! Authentication Models
//! Mission: Define user identity, token claims and login data structures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered principal as persisted by the credential store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: String,
}

/// Canonical form of an email address.
///
/// Applied on registration, on lookup and in the email ownership check, so the
/// three always agree on which two spellings name the same principal.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub_email: String,
    pub sub_id: Uuid,
    pub iat: i64, // issued-at, unix seconds
    pub exp: i64, // expiration, unix seconds (exclusive)
}

/// Identity recovered from a verified token, scoped to a single request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub subject_email: String,
    pub subject_id: Uuid,
}

impl From<Claims> for AuthenticatedIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            subject_email: claims.sub_email,
            subject_id: claims.sub_id,
        }
    }
}

/// Token minted by the codec together with its validity window
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Successful login: the serialized token plus the subject it was bound to
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub subject_id: Uuid,
    pub expires_at: i64,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: UserResponse,
}

/// Registration request body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// User response (sanitized)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Current identity as reported by `/auth/me`
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub id: String,
    pub email: String,
}

impl From<&AuthenticatedIdentity> for IdentityResponse {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            id: identity.subject_id.to_string(),
            email: identity.subject_email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$04$secret"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
    }

    #[test]
    fn test_identity_from_claims() {
        let id = Uuid::new_v4();
        let identity = AuthenticatedIdentity::from(Claims {
            sub_email: "alice@example.com".to_string(),
            sub_id: id,
            iat: 10,
            exp: 20,
        });
        assert_eq!(identity.subject_email, "alice@example.com");
        assert_eq!(identity.subject_id, id);
    }

    #[test]
    fn test_user_response_from_user() {
        let user = sample_user();
        let response = UserResponse::from_user(&user);
        assert_eq!(response.id, user.id.to_string());
        assert_eq!(response.email, "alice@example.com");
        assert_eq!(response.first_name, "Alice");
    }
}
