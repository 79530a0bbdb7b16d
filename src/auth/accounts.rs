//! Account Service
//! Mission: Register users and serve profile lookups

use crate::auth::errors::{RegistrationError, StoreError};
use crate::auth::models::{normalize_email, RegisterRequest, User};
use crate::auth::password::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::auth::user_store::CredentialStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Create a user with a freshly hashed password
    pub fn register(&self, request: RegisterRequest) -> Result<User, RegistrationError> {
        validate_registration(&request)?;

        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(|e| RegistrationError::Hashing(e.to_string()))?;

        let user = User {
            id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: normalize_email(&request.email),
            password_hash,
            created_at: Utc::now().to_rfc3339(),
        };

        self.store.insert(&user)?;

        info!("✅ Registered user: {} ({})", user.email, user.id);
        Ok(user)
    }

    pub fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, StoreError> {
        self.store.find_by_id(id)
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.store.find_by_email(email)
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<(), RegistrationError> {
    if request.first_name.trim().is_empty() {
        return Err(RegistrationError::InvalidInput("First name is required"));
    }
    if request.last_name.trim().is_empty() {
        return Err(RegistrationError::InvalidInput("Last name is required"));
    }
    if !looks_like_email(&normalize_email(&request.email)) {
        return Err(RegistrationError::InvalidInput("Email must be valid"));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::InvalidInput(
            "Password must be at least 8 characters",
        ));
    }
    if request.password.len() > MAX_PASSWORD_BYTES {
        return Err(RegistrationError::InvalidInput(
            "Password must be at most 72 bytes",
        ));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_COST;
    use crate::auth::user_store::UserStore;

    fn service() -> AccountService {
        let store = Arc::new(UserStore::in_memory().unwrap());
        AccountService::new(store, PasswordHasher::new(MIN_COST).unwrap())
    }

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let service = service();
        let user = service
            .register(request("Alice@Example.com", "secret123"))
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "secret123");

        let by_id = service.get_by_id(&user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        let by_email = service.get_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[test]
    fn test_registered_password_verifies() {
        let service = service();
        let user = service
            .register(request("alice@example.com", "secret123"))
            .unwrap();

        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        assert!(hasher.verify("secret123", &user.password_hash));
        assert!(!hasher.verify("secret12", &user.password_hash));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let service = service();
        service
            .register(request("alice@example.com", "secret123"))
            .unwrap();

        let err = service
            .register(request("ALICE@example.com", "different1"))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::EmailTaken));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let service = service();

        for (email, password) in [
            ("alice@example.com", "short"),
            ("not-an-email", "secret123"),
            ("@example.com", "secret123"),
            ("alice@", "secret123"),
            ("alice@localhost", "secret123"),
            ("al ice@example.com", "secret123"),
        ] {
            let err = service.register(request(email, password)).unwrap_err();
            assert!(
                matches!(err, RegistrationError::InvalidInput(_)),
                "{email}/{password} gave {err:?}"
            );
        }

        let mut blank_name = request("alice@example.com", "secret123");
        blank_name.first_name = "  ".to_string();
        assert!(matches!(
            service.register(blank_name).unwrap_err(),
            RegistrationError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_password_length_boundaries() {
        let service = service();

        let shortest = "a".repeat(MIN_PASSWORD_LEN);
        assert!(service.register(request("min@example.com", &shortest)).is_ok());
        let too_short = "a".repeat(MIN_PASSWORD_LEN - 1);
        assert!(matches!(
            service.register(request("short@example.com", &too_short)),
            Err(RegistrationError::InvalidInput(_))
        ));

        let longest = "x".repeat(MAX_PASSWORD_BYTES);
        assert!(service.register(request("max@example.com", &longest)).is_ok());
        let too_long = format!("{longest}real-secret");
        assert!(matches!(
            service.register(request("long@example.com", &too_long)),
            Err(RegistrationError::InvalidInput(_))
        ));
        assert!(service.get_by_email("long@example.com").unwrap().is_none());
    }

    #[test]
    fn test_unknown_user_is_none() {
        let service = service();
        assert!(service.get_by_id(&Uuid::new_v4()).unwrap().is_none());
        assert!(service.get_by_email("ghost@example.com").unwrap().is_none());
    }
}
