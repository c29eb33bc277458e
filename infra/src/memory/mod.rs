//! In-memory session repository.
//!
//! Development convenience only. State dies with the process, so a
//! production deployment refuses to start on this backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::warn;

use sv_core::domain::entities::session::SessionRecord;
use sv_core::errors::SessionStoreError;
use sv_core::repositories::SessionRepository;
use sv_shared::config::environment::Environment;
use sv_shared::errors::ConfigError;

/// HashMap-backed session repository
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionRepository {
    /// Create an empty repository, refusing production environments
    pub fn new(environment: Environment) -> Result<Self, ConfigError> {
        if environment.is_production() {
            return Err(ConfigError::invalid(
                "DATABASE_URL",
                "the in-memory session store is not permitted in production",
            ));
        }
        warn!("using in-memory session store; sessions will not survive restarts");
        Ok(Self::default())
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, record: SessionRecord) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&record.session_id) {
            return Err(SessionStoreError::DuplicateSessionId);
        }
        sessions.insert(record.session_id.clone(), record);
        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionRecord>, SessionStoreError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn mark_revoked(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(record) if !record.revoked => {
                record.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_revoked_for_user(&self, user_id: &str) -> Result<u64, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let mut count = 0;
        for record in sessions.values_mut() {
            if record.user_id == user_id && !record.revoked {
                record.revoke();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update_after_refresh(
        &self,
        session_id: &str,
        last_used_at: DateTime<Utc>,
        new_encrypted_token: Option<&str>,
    ) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionStoreError::unavailable("session not found for update"))?;
        record.last_used_at = last_used_at;
        if let Some(token) = new_encrypted_token {
            record.encrypted_refresh_token = token.to_string();
        }
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.created_at >= cutoff);
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(session_id: &str, user_id: &str) -> SessionRecord {
        SessionRecord::new(
            session_id.to_string(),
            user_id.to_string(),
            "blob".to_string(),
            None,
        )
    }

    #[test]
    fn test_production_environment_is_refused() {
        assert!(InMemorySessionRepository::new(Environment::Production).is_err());
        assert!(InMemorySessionRepository::new(Environment::Development).is_ok());
        assert!(InMemorySessionRepository::new(Environment::Staging).is_ok());
    }

    #[tokio::test]
    async fn test_insert_find_and_duplicate() {
        let repo = InMemorySessionRepository::new(Environment::Development).unwrap();
        repo.insert(record("sess-1", "user-1")).await.unwrap();

        assert!(repo.find_by_id("sess-1").await.unwrap().is_some());
        assert!(repo.find_by_id("sess-2").await.unwrap().is_none());
        assert!(matches!(
            repo.insert(record("sess-1", "user-2")).await,
            Err(SessionStoreError::DuplicateSessionId)
        ));
    }

    #[tokio::test]
    async fn test_revocation_paths() {
        let repo = InMemorySessionRepository::new(Environment::Development).unwrap();
        repo.insert(record("sess-1", "user-1")).await.unwrap();
        repo.insert(record("sess-2", "user-1")).await.unwrap();

        assert!(repo.mark_revoked("sess-1").await.unwrap());
        assert!(!repo.mark_revoked("sess-1").await.unwrap());
        assert_eq!(repo.mark_revoked_for_user("user-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_retention_sweep() {
        let repo = InMemorySessionRepository::new(Environment::Development).unwrap();
        repo.insert(record("sess-1", "user-1")).await.unwrap();

        let future_cutoff = Utc::now() + Duration::days(1);
        assert_eq!(repo.delete_older_than(future_cutoff).await.unwrap(), 1);
        assert!(repo.find_by_id("sess-1").await.unwrap().is_none());
    }
}
