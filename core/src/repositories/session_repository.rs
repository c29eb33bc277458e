//! Session repository trait defining the interface for session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::session::SessionRecord;
use crate::errors::SessionStoreError;

/// Repository trait for SessionRecord persistence operations
///
/// Implementations manage session records keyed by their opaque session
/// id. Only the encrypted form of a refresh token ever crosses this
/// interface.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session record
    ///
    /// # Returns
    /// * `Ok(())` - Record stored
    /// * `Err(SessionStoreError::DuplicateSessionId)` - The id is taken
    /// * `Err(SessionStoreError::Unavailable)` - Backend failure
    async fn insert(&self, record: SessionRecord) -> Result<(), SessionStoreError>;

    /// Find a session by its id
    ///
    /// # Returns
    /// * `Ok(Some(SessionRecord))` - Session found (possibly revoked or expired)
    /// * `Ok(None)` - No session with that id
    async fn find_by_id(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Mark a session as revoked
    ///
    /// Idempotent: revoking an already-revoked session reports `false`
    /// without error.
    ///
    /// # Returns
    /// * `Ok(true)` - The session transitioned to revoked
    /// * `Ok(false)` - No active session with that id
    async fn mark_revoked(&self, session_id: &str) -> Result<bool, SessionStoreError>;

    /// Mark all active sessions of a user as revoked
    ///
    /// # Returns
    /// * `Ok(count)` - Number of sessions that transitioned to revoked
    async fn mark_revoked_for_user(&self, user_id: &str) -> Result<u64, SessionStoreError>;

    /// Record a successful refresh on a session
    ///
    /// Updates `last_used_at`, and replaces the stored encrypted token
    /// when the provider rotated it.
    async fn update_after_refresh(
        &self,
        session_id: &str,
        last_used_at: DateTime<Utc>,
        new_encrypted_token: Option<&str>,
    ) -> Result<(), SessionStoreError>;

    /// Delete sessions created before the cutoff
    ///
    /// Applies to revoked and active sessions alike; a session older
    /// than the retention window is garbage either way.
    ///
    /// # Returns
    /// * `Ok(count)` - Number of records deleted
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionStoreError>;
}
