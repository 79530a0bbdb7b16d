//! Password Hasher
//! Mission: Salted, deliberately slow password hashing that fails closed

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Lowest and highest work factors bcrypt accepts
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt only reads this many bytes of input; anything longer is refused
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt-backed password hasher.
///
/// Every `hash` call draws a fresh salt, which is embedded in the returned
/// string; `verify` reads it back from there.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            bail!("bcrypt cost must be within {MIN_COST}..={MAX_COST}, got {cost}");
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            bail!("Password exceeds {MAX_PASSWORD_BYTES} bytes");
        }
        bcrypt::hash(plaintext, self.cost).context("Failed to hash password")
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash is reported as a mismatch, never as an error.
    /// Overlong input still pays for a full verification, then fails.
    pub fn verify(&self, plaintext: &str, password_hash: &str) -> bool {
        let within_limit = plaintext.len() <= MAX_PASSWORD_BYTES;
        match bcrypt::verify(plaintext, password_hash) {
            Ok(valid) => valid && within_limit,
            Err(e) => {
                debug!("Stored password hash rejected: {}", e);
                false
            }
        }
    }

    /// True when a stored hash was made with a different work factor than ours
    pub fn needs_rehash(&self, password_hash: &str) -> bool {
        match password_hash.parse::<bcrypt::HashParts>() {
            Ok(parts) => parts.get_cost() != self.cost,
            Err(_) => false,
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret123").unwrap();

        assert!(hasher.verify("secret123", &hash));
        assert!(!hasher.verify("secret124", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_each_hash_is_salted() {
        let hasher = fast_hasher();
        let first = hasher.hash("secret123").unwrap();
        let second = hasher.hash("secret123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first));
        assert!(hasher.verify("secret123", &second));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = fast_hasher().hash("secret123").unwrap();
        assert!(!hash.contains("secret123"));
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let hasher = fast_hasher();
        assert!(!hasher.verify("secret123", ""));
        assert!(!hasher.verify("secret123", "not-a-bcrypt-hash"));
        assert!(!hasher.verify("secret123", "$2b$04$truncated"));
    }

    #[test]
    fn test_password_length_limit() {
        let hasher = fast_hasher();
        let at_limit = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hasher.hash(&at_limit).unwrap();
        assert!(hasher.verify(&at_limit, &hash));

        // Same 72-byte prefix must not be enough
        assert!(hasher.hash(&format!("{at_limit}correct-suffix")).is_err());
        assert!(!hasher.verify(&format!("{at_limit}WRONG"), &hash));

        // Multi-byte characters count by bytes
        let wide = "é".repeat(MAX_PASSWORD_BYTES / 2 + 1);
        assert!(hasher.hash(&wide).is_err());
    }

    #[test]
    fn test_needs_rehash_tracks_cost() {
        let old = fast_hasher().hash("secret123").unwrap();
        let current = PasswordHasher::new(MIN_COST + 1).unwrap();

        assert!(current.needs_rehash(&old));
        assert!(!fast_hasher().needs_rehash(&old));
        assert!(!current.needs_rehash("not-a-bcrypt-hash"));
    }

    #[test]
    fn test_cost_bounds() {
        assert!(PasswordHasher::new(3).is_err());
        assert!(PasswordHasher::new(32).is_err());
        assert_eq!(PasswordHasher::new(4).unwrap().cost(), 4);
        assert_eq!(PasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }
}
