//! Access Policy
//! Mission: Users may only reach their own records

use crate::auth::models::{normalize_email, AuthenticatedIdentity};
use uuid::Uuid;

/// Outcome of an ownership check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub denied_reason: Option<&'static str>,
}

impl AccessDecision {
    fn from_ownership(owns: bool) -> Self {
        if owns {
            Self {
                allowed: true,
                denied_reason: None,
            }
        } else {
            Self {
                allowed: false,
                denied_reason: Some("resource belongs to another user"),
            }
        }
    }
}

/// Ownership is the only authorization axis: no roles, no delegation, no override.
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn can_access_by_id(identity: &AuthenticatedIdentity, requested_id: &Uuid) -> bool {
        identity.subject_id == *requested_id
    }

    /// Compares under the same normalization the credential store uses
    pub fn can_access_by_email(identity: &AuthenticatedIdentity, requested_email: &str) -> bool {
        normalize_email(&identity.subject_email) == normalize_email(requested_email)
    }

    pub fn decide_by_id(identity: &AuthenticatedIdentity, requested_id: &Uuid) -> AccessDecision {
        AccessDecision::from_ownership(Self::can_access_by_id(identity, requested_id))
    }

    pub fn decide_by_email(
        identity: &AuthenticatedIdentity,
        requested_email: &str,
    ) -> AccessDecision {
        AccessDecision::from_ownership(Self::can_access_by_email(identity, requested_email))
    }
}
