//! Session protocol operations.
//!
//! One service owns the whole session lifecycle: creating sessions
//! around freshly issued refresh tokens, exchanging sessions for new
//! access tokens, and revoking or sweeping them. The raw refresh token
//! exists in memory only inside these methods; everything that leaves
//! the service is either encrypted or deliberately public.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, warn};

use sv_shared::config::vault::DEFAULT_RETENTION_DAYS;

use crate::domain::entities::session::{SessionRecord, SESSION_ID_LENGTH};
use crate::domain::value_objects::AccessGrant;
use crate::errors::{ProviderError, SessionError, SessionResult, SessionStoreError};
use crate::repositories::SessionRepository;
use crate::services::cipher::TokenCipher;
use crate::services::provider::IdentityProvider;

/// Session service configuration
#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// Retention window for the cleanup sweep, in days
    pub retention_days: i64,

    /// Optional hard session lifetime, in days
    pub session_ttl_days: Option<i64>,

    /// Attempts at a unique session id before giving up
    pub max_create_attempts: u32,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            session_ttl_days: None,
            max_create_attempts: 3,
        }
    }
}

/// Service implementing the session protocol
pub struct SessionService<R, P>
where
    R: SessionRepository,
    P: IdentityProvider,
{
    repository: Arc<R>,
    provider: Arc<P>,
    cipher: TokenCipher,
    config: SessionServiceConfig,
}

impl<R, P> SessionService<R, P>
where
    R: SessionRepository,
    P: IdentityProvider,
{
    /// Create a new session service
    pub fn new(
        repository: Arc<R>,
        provider: Arc<P>,
        cipher: TokenCipher,
        config: SessionServiceConfig,
    ) -> Self {
        Self {
            repository,
            provider,
            cipher,
            config,
        }
    }

    /// Store a refresh token under a fresh session
    ///
    /// Encrypts the token, generates an opaque session id, and inserts
    /// the record. Id collisions are retried up to the configured
    /// attempt limit; exhausting it maps to `CreationFailed`.
    ///
    /// # Returns
    /// * `Ok(session_id)` - The id to hand to the client as a cookie
    pub async fn store_refresh(
        &self,
        user_id: &str,
        refresh_token: &str,
    ) -> SessionResult<String> {
        require_non_empty(user_id, "user_id")?;
        require_non_empty(refresh_token, "refresh_token")?;

        let encrypted = self.cipher.encrypt(refresh_token)?;
        let expires_at = self.session_expiry();

        for _ in 0..self.config.max_create_attempts {
            let session_id = generate_session_id();
            let record = SessionRecord::new(
                session_id.clone(),
                user_id.to_string(),
                encrypted.clone(),
                expires_at,
            );

            match self.repository.insert(record).await {
                Ok(()) => {
                    info!(user_id = %user_id, "session created");
                    return Ok(session_id);
                }
                Err(SessionStoreError::DuplicateSessionId) => {
                    warn!("session id collision, retrying");
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(SessionError::CreationFailed)
    }

    /// Exchange a session for a fresh access token
    ///
    /// Looks up the session, decrypts its refresh token, and forwards
    /// it to the identity provider. A decrypt failure or a provider
    /// rejection revokes the session before reporting it invalid; an
    /// unreachable provider leaves the session untouched.
    pub async fn refresh(&self, session_id: &str) -> SessionResult<AccessGrant> {
        let record = self
            .repository
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::InvalidSession)?;

        if !record.is_usable() {
            return Err(SessionError::InvalidSession);
        }

        let refresh_token = match self.cipher.decrypt(&record.encrypted_refresh_token) {
            Ok(token) => token,
            Err(_) => {
                warn!(user_id = %record.user_id, "stored token undecryptable, revoking session");
                self.repository.mark_revoked(session_id).await?;
                return Err(SessionError::InvalidSession);
            }
        };

        let tokens = match self.provider.refresh(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(ProviderError::Rejected) => {
                warn!(user_id = %record.user_id, "provider rejected stored token, revoking session");
                self.repository.mark_revoked(session_id).await?;
                return Err(SessionError::InvalidSession);
            }
            Err(error) => return Err(error.into()),
        };

        let rotated = match &tokens.refresh_token {
            Some(new_token) => Some(self.cipher.encrypt(new_token)?),
            None => None,
        };
        self.repository
            .update_after_refresh(session_id, Utc::now(), rotated.as_deref())
            .await?;

        Ok(AccessGrant::new(tokens.access_token, tokens.expires_at))
    }

    /// Clear a session on logout
    ///
    /// Succeeds whether or not a session was presented; the caller
    /// clears the cookie either way. Revoking an unknown or
    /// already-revoked session is a no-op.
    pub async fn clear_refresh(&self, session_id: Option<&str>) -> SessionResult<()> {
        if let Some(session_id) = session_id.filter(|s| !s.is_empty()) {
            if self.repository.mark_revoked(session_id).await? {
                info!("session cleared");
            }
        }
        Ok(())
    }

    /// Revoke a single session (admin operation)
    ///
    /// # Returns
    /// * `Ok(true)` - The session transitioned to revoked
    /// * `Ok(false)` - Unknown or already revoked
    pub async fn revoke_session(&self, session_id: &str) -> SessionResult<bool> {
        require_non_empty(session_id, "session_id")?;
        let revoked = self.repository.mark_revoked(session_id).await?;
        if revoked {
            info!("session revoked by admin");
        }
        Ok(revoked)
    }

    /// Revoke every active session of a user (admin operation)
    ///
    /// # Returns
    /// * `Ok(count)` - Number of sessions revoked
    pub async fn revoke_user_sessions(&self, user_id: &str) -> SessionResult<u64> {
        require_non_empty(user_id, "user_id")?;
        let count = self.repository.mark_revoked_for_user(user_id).await?;
        info!(user_id = %user_id, count, "user sessions revoked by admin");
        Ok(count)
    }

    /// Delete sessions created before the retention window
    ///
    /// `days` overrides the configured window; `None` uses it. Zero or
    /// negative overrides are rejected rather than interpreted as
    /// "delete everything".
    ///
    /// # Returns
    /// * `Ok(count)` - Number of records deleted
    pub async fn cleanup_sessions(&self, days: Option<i64>) -> SessionResult<u64> {
        let days = days.unwrap_or(self.config.retention_days);
        if days <= 0 {
            return Err(SessionError::Validation {
                field: "days".to_string(),
            });
        }

        let cutoff = Utc::now() - Duration::days(days);
        let deleted = self.repository.delete_older_than(cutoff).await?;
        info!(deleted, days, "session cleanup completed");
        Ok(deleted)
    }

    fn session_expiry(&self) -> Option<DateTime<Utc>> {
        self.config
            .session_ttl_days
            .map(|days| Utc::now() + Duration::days(days))
    }
}

/// Generate an opaque alphanumeric session id
fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

fn require_non_empty(value: &str, field: &str) -> SessionResult<()> {
    if value.trim().is_empty() {
        return Err(SessionError::Validation {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::repositories::MockSessionRepository;
    use crate::services::provider::stub::StubIdentityProvider;
    use crate::services::provider::ProviderTokens;

    use super::*;

    fn provider_tokens(access: &str, rotated: Option<&str>) -> ProviderTokens {
        ProviderTokens {
            access_token: access.to_string(),
            refresh_token: rotated.map(String::from),
            expires_at: (Utc::now() + Duration::hours(1)).timestamp(),
        }
    }

    fn service(
        repo: MockSessionRepository,
        provider: StubIdentityProvider,
    ) -> SessionService<MockSessionRepository, StubIdentityProvider> {
        SessionService::new(
            Arc::new(repo),
            Arc::new(provider),
            TokenCipher::new("unit-test-secret").unwrap(),
            SessionServiceConfig::default(),
        )
    }

    #[test]
    fn test_generated_ids_are_opaque() {
        let id = generate_session_id();
        assert_eq!(id.len(), SESSION_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, generate_session_id());
    }

    #[tokio::test]
    async fn test_store_refresh_encrypts_at_rest() {
        let repo = MockSessionRepository::new();
        let svc = service(repo.clone(), StubIdentityProvider::rejecting());

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        assert_eq!(session_id.len(), SESSION_ID_LENGTH);

        let stored = repo.get(&session_id).await.unwrap();
        assert_eq!(stored.user_id, "user-1");
        assert_ne!(stored.encrypted_refresh_token, "rt-abc");
        assert!(!stored.encrypted_refresh_token.contains("rt-abc"));
    }

    #[tokio::test]
    async fn test_store_refresh_rejects_blank_input() {
        let svc = service(
            MockSessionRepository::new(),
            StubIdentityProvider::rejecting(),
        );
        assert!(matches!(
            svc.store_refresh("", "rt-abc").await,
            Err(SessionError::Validation { field }) if field == "user_id"
        ));
        assert!(matches!(
            svc.store_refresh("user-1", "  ").await,
            Err(SessionError::Validation { field }) if field == "refresh_token"
        ));
    }

    #[tokio::test]
    async fn test_store_refresh_retries_id_collision() {
        let repo = MockSessionRepository::new();
        repo.fail_next_insert_with_duplicate().await;
        let svc = service(repo.clone(), StubIdentityProvider::rejecting());

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        assert!(repo.get(&session_id).await.is_some());
    }

    #[tokio::test]
    async fn test_refresh_full_exchange_with_rotation() {
        let repo = MockSessionRepository::new();
        let provider = StubIdentityProvider::accepting(provider_tokens("at-1", Some("rt-def")));
        let svc = service(repo.clone(), provider.clone());

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        let blob_before = repo.get(&session_id).await.unwrap().encrypted_refresh_token;

        let grant = svc.refresh(&session_id).await.unwrap();
        assert_eq!(grant.access_token, "at-1");

        // The provider saw the original token; the store now holds the
        // rotated one under fresh encryption
        assert_eq!(provider.calls().await, vec!["rt-abc"]);
        let blob_after = repo.get(&session_id).await.unwrap().encrypted_refresh_token;
        assert_ne!(blob_before, blob_after);

        let cipher = TokenCipher::new("unit-test-secret").unwrap();
        assert_eq!(cipher.decrypt(&blob_after).unwrap(), "rt-def");
    }

    #[tokio::test]
    async fn test_refresh_without_rotation_keeps_stored_token() {
        let repo = MockSessionRepository::new();
        let provider = StubIdentityProvider::accepting(provider_tokens("at-1", None));
        let svc = service(repo.clone(), provider);

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        let blob_before = repo.get(&session_id).await.unwrap().encrypted_refresh_token;

        svc.refresh(&session_id).await.unwrap();
        let blob_after = repo.get(&session_id).await.unwrap().encrypted_refresh_token;
        assert_eq!(blob_before, blob_after);
    }

    #[tokio::test]
    async fn test_refresh_unknown_session_is_invalid() {
        let svc = service(
            MockSessionRepository::new(),
            StubIdentityProvider::accepting(provider_tokens("at-1", None)),
        );
        assert!(matches!(
            svc.refresh("no-such-session").await,
            Err(SessionError::InvalidSession)
        ));
    }

    #[tokio::test]
    async fn test_refresh_revoked_session_is_invalid() {
        let repo = MockSessionRepository::new();
        let svc = service(
            repo.clone(),
            StubIdentityProvider::accepting(provider_tokens("at-1", None)),
        );

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        repo.mark_revoked(&session_id).await.unwrap();

        assert!(matches!(
            svc.refresh(&session_id).await,
            Err(SessionError::InvalidSession)
        ));
    }

    #[tokio::test]
    async fn test_refresh_expired_session_is_invalid() {
        let repo = MockSessionRepository::new();
        let svc = service(
            repo.clone(),
            StubIdentityProvider::accepting(provider_tokens("at-1", None)),
        );

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        let mut record = repo.get(&session_id).await.unwrap();
        record.expires_at = Some(Utc::now() - Duration::hours(1));
        repo.put(record).await;

        assert!(matches!(
            svc.refresh(&session_id).await,
            Err(SessionError::InvalidSession)
        ));
    }

    #[tokio::test]
    async fn test_refresh_undecryptable_token_revokes_session() {
        let repo = MockSessionRepository::new();
        let svc = service(
            repo.clone(),
            StubIdentityProvider::accepting(provider_tokens("at-1", None)),
        );

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        let mut record = repo.get(&session_id).await.unwrap();
        record.encrypted_refresh_token = "corrupted-blob".to_string();
        repo.put(record).await;

        assert!(matches!(
            svc.refresh(&session_id).await,
            Err(SessionError::InvalidSession)
        ));
        assert!(repo.get(&session_id).await.unwrap().revoked);
    }

    #[tokio::test]
    async fn test_refresh_provider_rejection_revokes_session() {
        let repo = MockSessionRepository::new();
        let svc = service(repo.clone(), StubIdentityProvider::rejecting());

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        assert!(matches!(
            svc.refresh(&session_id).await,
            Err(SessionError::InvalidSession)
        ));
        assert!(repo.get(&session_id).await.unwrap().revoked);
    }

    #[tokio::test]
    async fn test_refresh_provider_outage_keeps_session() {
        let repo = MockSessionRepository::new();
        let svc = service(repo.clone(), StubIdentityProvider::unreachable());

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        assert!(matches!(
            svc.refresh(&session_id).await,
            Err(SessionError::Provider(ProviderError::Unreachable { .. }))
        ));
        assert!(!repo.get(&session_id).await.unwrap().revoked);
    }

    #[tokio::test]
    async fn test_store_clear_refresh_sequence() {
        let repo = MockSessionRepository::new();
        let svc = service(
            repo.clone(),
            StubIdentityProvider::accepting(provider_tokens("at-1", None)),
        );

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        svc.clear_refresh(Some(&session_id)).await.unwrap();

        assert!(matches!(
            svc.refresh(&session_id).await,
            Err(SessionError::InvalidSession)
        ));
    }

    #[tokio::test]
    async fn test_clear_refresh_without_session_succeeds() {
        let svc = service(
            MockSessionRepository::new(),
            StubIdentityProvider::rejecting(),
        );
        svc.clear_refresh(None).await.unwrap();
        svc.clear_refresh(Some("unknown")).await.unwrap();
        svc.clear_refresh(Some("")).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_session_reports_transition() {
        let repo = MockSessionRepository::new();
        let svc = service(repo.clone(), StubIdentityProvider::rejecting());

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        assert!(svc.revoke_session(&session_id).await.unwrap());
        assert!(!svc.revoke_session(&session_id).await.unwrap());
        assert!(!svc.revoke_session("unknown").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_user_sessions_counts() {
        let repo = MockSessionRepository::new();
        let svc = service(repo.clone(), StubIdentityProvider::rejecting());

        svc.store_refresh("user-1", "rt-a").await.unwrap();
        svc.store_refresh("user-1", "rt-b").await.unwrap();
        svc.store_refresh("user-2", "rt-c").await.unwrap();

        assert_eq!(svc.revoke_user_sessions("user-1").await.unwrap(), 2);
        assert_eq!(svc.revoke_user_sessions("user-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_uses_default_retention() {
        let repo = MockSessionRepository::new();
        let svc = service(repo.clone(), StubIdentityProvider::rejecting());

        let session_id = svc.store_refresh("user-1", "rt-a").await.unwrap();
        let mut stale = repo.get(&session_id).await.unwrap();
        stale.created_at = Utc::now() - Duration::days(45);
        repo.put(stale).await;
        svc.store_refresh("user-2", "rt-b").await.unwrap();

        assert_eq!(svc.cleanup_sessions(None).await.unwrap(), 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_cleanup_rejects_non_positive_windows() {
        let svc = service(
            MockSessionRepository::new(),
            StubIdentityProvider::rejecting(),
        );
        assert!(matches!(
            svc.cleanup_sessions(Some(0)).await,
            Err(SessionError::Validation { field }) if field == "days"
        ));
        assert!(svc.cleanup_sessions(Some(-5)).await.is_err());
    }

    #[tokio::test]
    async fn test_session_ttl_stamps_expiry() {
        let repo = MockSessionRepository::new();
        let svc = SessionService::new(
            Arc::new(repo.clone()),
            Arc::new(StubIdentityProvider::rejecting()),
            TokenCipher::new("unit-test-secret").unwrap(),
            SessionServiceConfig {
                session_ttl_days: Some(7),
                ..SessionServiceConfig::default()
            },
        );

        let session_id = svc.store_refresh("user-1", "rt-abc").await.unwrap();
        let record = repo.get(&session_id).await.unwrap();
        let expires_at = record.expires_at.unwrap();
        assert!(expires_at > Utc::now() + Duration::days(6));
        assert!(expires_at < Utc::now() + Duration::days(8));
    }
}
