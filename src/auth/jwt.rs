//! JWT Token Handler
//! Mission: Mint and verify signed, expiring identity tokens

use crate::auth::errors::TokenError;
use crate::auth::models::{AuthenticatedIdentity, Claims, IssuedToken};
use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;
use uuid::Uuid;

/// JWT Handler for token operations.
///
/// Tokens are HS256 JWTs whose claims carry the subject email and id plus an
/// absolute `[iat, exp)` validity window. The window is checked here against an
/// explicit `now` rather than by the library, so expiry has no leeway.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: String) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for a subject, valid for `ttl` from now
    pub fn issue(&self, email: &str, subject_id: Uuid, ttl: Duration) -> Result<IssuedToken> {
        self.issue_at(email, subject_id, ttl, Utc::now().timestamp())
    }

    /// Issue a token whose window starts at `now` (unix seconds)
    pub fn issue_at(
        &self,
        email: &str,
        subject_id: Uuid,
        ttl: Duration,
        now: i64,
    ) -> Result<IssuedToken> {
        let ttl_secs = ttl.num_seconds();
        if ttl_secs < 1 {
            bail!("token ttl must be at least one second, got {}s", ttl_secs);
        }
        let expires_at = now.checked_add(ttl_secs).context("Invalid timestamp")?;

        let claims = Claims {
            sub_email: email.to_string(),
            sub_id: subject_id,
            iat: now,
            exp: expires_at,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")?;

        debug!(
            "Issued JWT for {} ({}), expires in {}s",
            email, subject_id, ttl_secs
        );

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }

    /// Validate a token against the current time
    pub fn parse(&self, token: &str) -> Result<AuthenticatedIdentity, TokenError> {
        self.parse_at(token, Utc::now().timestamp())
    }

    /// Validate a token against `now` (unix seconds).
    ///
    /// The signature is checked before any claim is read; only then is the
    /// validity window consulted.
    pub fn parse_at(&self, token: &str, now: i64) -> Result<AuthenticatedIdentity, TokenError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(&e))?;
        let claims = decoded.claims;

        if now < claims.iat || now >= claims.exp {
            debug!("Rejected JWT for {}: outside validity window", claims.sub_id);
            return Err(TokenError::Expired);
        }

        debug!("Validated JWT for {}", claims.sub_id);
        Ok(claims.into())
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::Invalid,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const SECRET: &str = "test-secret-key-0123456789abcdef";

    fn handler() -> JwtHandler {
        JwtHandler::new(SECRET.to_string())
    }

    fn issue(handler: &JwtHandler, id: Uuid) -> IssuedToken {
        handler
            .issue_at("alice@example.com", id, Duration::hours(24), NOW)
            .unwrap()
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let handler = handler();
        let id = Uuid::new_v4();
        let issued = issue(&handler, id);

        assert_eq!(issued.issued_at, NOW);
        assert_eq!(issued.expires_at, NOW + 24 * 3600);
        assert_eq!(issued.token.split('.').count(), 3);

        let identity = handler.parse_at(&issued.token, NOW).unwrap();
        assert_eq!(identity.subject_email, "alice@example.com");
        assert_eq!(identity.subject_id, id);

        let identity = handler.parse_at(&issued.token, issued.expires_at - 1).unwrap();
        assert_eq!(identity.subject_id, id);
    }

    #[test]
    fn test_token_expires_at_window_end() {
        let handler = handler();
        let issued = issue(&handler, Uuid::new_v4());

        assert_eq!(
            handler.parse_at(&issued.token, issued.expires_at),
            Err(TokenError::Expired)
        );
        assert_eq!(
            handler.parse_at(&issued.token, issued.expires_at + 3600),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_not_valid_before_issue() {
        let handler = handler();
        let issued = issue(&handler, Uuid::new_v4());

        assert_eq!(
            handler.parse_at(&issued.token, NOW - 1),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_fresh_token_valid_now() {
        let handler = handler();
        let id = Uuid::new_v4();
        let issued = handler
            .issue("bob@example.com", id, Duration::minutes(5))
            .unwrap();

        let identity = handler.parse(&issued.token).unwrap();
        assert_eq!(identity.subject_email, "bob@example.com");
        assert_eq!(identity.subject_id, id);
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let handler = handler();
        assert!(handler
            .issue_at("alice@example.com", Uuid::new_v4(), Duration::zero(), NOW)
            .is_err());
        assert!(handler
            .issue_at("alice@example.com", Uuid::new_v4(), Duration::seconds(-5), NOW)
            .is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret-one-0123456789abcdefghijkl".to_string());
        let handler2 = JwtHandler::new("secret-two-0123456789abcdefghijkl".to_string());
        let issued = issue(&handler1, Uuid::new_v4());

        assert_eq!(
            handler2.parse_at(&issued.token, NOW),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let handler = handler();

        for token in ["", "invalid", "invalid.token", "a.b.c", "...", "not a token at all"] {
            assert_eq!(
                handler.parse_at(token, NOW),
                Err(TokenError::Malformed),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_spliced_claims_rejected() {
        let handler = handler();
        let alice = issue(&handler, Uuid::new_v4());
        let bob = handler
            .issue_at("bob@example.com", Uuid::new_v4(), Duration::hours(24), NOW)
            .unwrap();

        let alice_parts: Vec<&str> = alice.token.split('.').collect();
        let bob_parts: Vec<&str> = bob.token.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], bob_parts[1], alice_parts[2]);

        assert_eq!(handler.parse_at(&forged, NOW), Err(TokenError::Invalid));
    }

    #[test]
    fn test_bit_flips_never_accepted() {
        let handler = handler();
        let id = Uuid::new_v4();
        let issued = issue(&handler, id);
        let original = issued.token.as_bytes();

        for pos in 0..original.len() {
            for bit in [0x01u8, 0x02, 0x04] {
                let mut tampered = original.to_vec();
                tampered[pos] ^= bit;
                let Ok(tampered) = String::from_utf8(tampered) else {
                    continue;
                };

                match handler.parse_at(&tampered, NOW) {
                    Err(TokenError::Invalid) | Err(TokenError::Malformed) => {}
                    other => panic!(
                        "flip of bit {:#04x} at {} produced {:?}",
                        bit, pos, other
                    ),
                }
            }
        }
    }
}
