//! Access grant value object returned from refresh operations.

use serde::{Deserialize, Serialize};

/// Result of a successful session refresh
///
/// This is the complete client-visible surface of a refresh: the new
/// access token and its absolute expiry. The rotated refresh token
/// stays server-side and is never included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessGrant {
    /// Short-lived access token issued by the identity provider
    pub access_token: String,

    /// Absolute expiry of the access token, as a Unix timestamp
    pub expires_at: i64,
}

impl AccessGrant {
    /// Creates a new access grant
    pub fn new(access_token: String, expires_at: i64) -> Self {
        Self {
            access_token,
            expires_at,
        }
    }
}
