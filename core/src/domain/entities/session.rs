//! Session entity for server-side refresh token custody.
//!
//! A session record binds an opaque session identifier to a user and the
//! encrypted refresh token held on their behalf. The raw refresh token
//! never appears on this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of generated session identifiers, in alphanumeric characters
pub const SESSION_ID_LENGTH: usize = 32;

/// A stored session and its encrypted refresh token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    /// Opaque session identifier handed to the client as a cookie value
    pub session_id: String,

    /// Identifier of the user the session belongs to
    pub user_id: String,

    /// Refresh token, encrypted with the vault cipher before storage
    pub encrypted_refresh_token: String,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session last performed a refresh
    pub last_used_at: DateTime<Utc>,

    /// Whether the session has been revoked. Terminal: a revoked
    /// session is never reactivated.
    pub revoked: bool,

    /// Optional hard expiry. A session past this instant behaves
    /// exactly like a revoked one.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a new session record
    pub fn new(
        session_id: String,
        user_id: String,
        encrypted_refresh_token: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            user_id,
            encrypted_refresh_token,
            created_at: now,
            last_used_at: now,
            revoked: false,
            expires_at,
        }
    }

    /// Check if the session is past its hard expiry
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }

    /// Check if the session may still be used for refresh
    pub fn is_usable(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// Revoke the session
    pub fn revoke(&mut self) {
        self.revoked = true;
    }

    /// Record a successful refresh, optionally rotating the stored token
    pub fn touch(&mut self, new_encrypted_token: Option<String>) {
        self.last_used_at = Utc::now();
        if let Some(token) = new_encrypted_token {
            self.encrypted_refresh_token = token;
        }
    }
}
