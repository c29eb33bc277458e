//! Bearer-token gate in front of the admin operations.
//!
//! Two credential paths, either sufficient on its own:
//!
//! 1. A static admin token, compared in constant time.
//! 2. A signed HS256 token whose `role` claim is `admin` or `service`.
//!
//! The gate fails closed. With neither credential configured every
//! request is denied, and no input makes `authorize` panic.

use constant_time_eq::constant_time_eq;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Roles accepted on signed admin tokens
const ALLOWED_ROLES: &[&str] = &["admin", "service"];

/// Claims carried by a signed admin token
#[derive(Debug, Serialize, Deserialize)]
struct AdminClaims {
    /// Caller identity, surfaced in audit logs
    #[serde(default)]
    sub: Option<String>,

    /// Role granted to the caller
    #[serde(default)]
    role: Option<String>,

    /// Expiry, required and enforced
    exp: i64,
}

/// Outcome of an admin authorization check
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDecision {
    /// Whether the request may proceed
    pub allowed: bool,

    /// Identity of the authorized caller, for audit logs
    pub identity: Option<String>,
}

impl AdminDecision {
    fn denied() -> Self {
        Self {
            allowed: false,
            identity: None,
        }
    }

    fn allowed(identity: impl Into<String>) -> Self {
        Self {
            allowed: true,
            identity: Some(identity.into()),
        }
    }
}

/// Authorizes requests against the admin surface
#[derive(Clone)]
pub struct AdminGate {
    static_token: Option<String>,
    signing_secret: Option<String>,
}

impl AdminGate {
    /// Create a gate from the configured credentials
    ///
    /// Empty strings are treated as absent, so an env var set to `""`
    /// does not open a credential path.
    pub fn new(static_token: Option<String>, signing_secret: Option<String>) -> Self {
        Self {
            static_token: static_token.filter(|t| !t.trim().is_empty()),
            signing_secret: signing_secret.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Whether any credential path is configured
    pub fn is_configured(&self) -> bool {
        self.static_token.is_some() || self.signing_secret.is_some()
    }

    /// Check a bearer token against both credential paths
    pub fn authorize(&self, bearer: Option<&str>) -> AdminDecision {
        let Some(bearer) = bearer.filter(|t| !t.is_empty()) else {
            return AdminDecision::denied();
        };

        if let Some(expected) = &self.static_token {
            if constant_time_eq(bearer.as_bytes(), expected.as_bytes()) {
                return AdminDecision::allowed("admin");
            }
        }

        if let Some(secret) = &self.signing_secret {
            if let Some(decision) = self.check_signed_token(bearer, secret) {
                return decision;
            }
        }

        debug!("admin authorization denied");
        AdminDecision::denied()
    }

    fn check_signed_token(&self, bearer: &str, secret: &str) -> Option<AdminDecision> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<AdminClaims>(bearer, &key, &validation).ok()?;
        let claims = token_data.claims;

        let role = claims.role?;
        if !ALLOWED_ROLES.contains(&role.as_str()) {
            return None;
        }

        let identity = claims.sub.unwrap_or_else(|| role.clone());
        Some(AdminDecision::allowed(identity))
    }
}
