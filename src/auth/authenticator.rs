//! Authenticator
//! Mission: Turn an email and password into a signed identity token

use crate::auth::errors::{AuthError, TokenError};
use crate::auth::jwt::JwtHandler;
use crate::auth::models::{AuthenticatedIdentity, LoginOutcome};
use crate::auth::password::PasswordHasher;
use crate::auth::user_store::CredentialStore;
use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Orchestrates credential lookup, password verification and token issuance.
///
/// Holds only read-only handles, so one instance is shared by every request.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    jwt: Arc<JwtHandler>,
    token_ttl: Duration,
    // Verified against when the email is unknown so both failure paths pay one bcrypt round.
    // Stored hashes are moved to the same cost on their next successful login.
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        jwt: Arc<JwtHandler>,
        token_ttl: Duration,
    ) -> Result<Self> {
        let dummy_hash = hasher.hash(&Uuid::new_v4().to_string())?;
        Ok(Self {
            store,
            hasher,
            jwt,
            token_ttl,
            dummy_hash,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Verify credentials and issue a token bound to the matching user
    pub fn authenticate(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        let Some(user) = user else {
            let _ = self.hasher.verify(password, &self.dummy_hash);
            warn!("❌ Failed login attempt: {}", email);
            return Err(AuthError::AuthenticationFailed);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            warn!("❌ Failed login attempt: {}", email);
            return Err(AuthError::AuthenticationFailed);
        }

        if self.hasher.needs_rehash(&user.password_hash) {
            self.upgrade_hash(&user.id, password);
        }

        let issued = self
            .jwt
            .issue(&user.email, user.id, self.token_ttl)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        debug!("Authenticated {} ({})", user.email, user.id);

        Ok(LoginOutcome {
            token: issued.token,
            subject_id: user.id,
            expires_at: issued.expires_at,
        })
    }

    // Best effort: a failed upgrade leaves the old hash valid
    fn upgrade_hash(&self, id: &Uuid, password: &str) {
        let upgraded = self
            .hasher
            .hash(password)
            .map_err(|e| e.to_string())
            .and_then(|hash| {
                self.store
                    .update_password_hash(id, &hash)
                    .map_err(|e| e.to_string())
            });
        match upgraded {
            Ok(()) => debug!("Rehashed password for {} at cost {}", id, self.hasher.cost()),
            Err(e) => warn!("Password rehash failed for {}: {}", id, e),
        }
    }

    /// Decode a bearer token into the identity it was issued for
    pub fn resolve_identity(&self, token: &str) -> Result<AuthenticatedIdentity, TokenError> {
        self.jwt.parse(token)
    }
}
