//! Command envelope for the session protocol.
//!
//! Transport adapters deserialize a single tagged envelope and hand it
//! to [`SessionService::dispatch`], so HTTP routes and any future
//! queue or function-invocation entry point share one dispatch path.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::AccessGrant;
use crate::errors::SessionResult;
use crate::repositories::SessionRepository;
use crate::services::provider::IdentityProvider;
use crate::services::session::service::SessionService;

/// A session protocol operation, as received from a transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Store a freshly issued refresh token under a new session
    StoreRefresh {
        user_id: String,
        refresh_token: String,
    },

    /// Exchange a session for a new access token
    Refresh { session_id: String },

    /// Clear a session on logout
    ClearRefresh {
        #[serde(default)]
        session_id: Option<String>,
    },

    /// Revoke a single session (admin)
    RevokeSession { session_id: String },

    /// Revoke every session of a user (admin)
    RevokeUserSessions { user_id: String },

    /// Delete sessions older than the retention window (admin)
    Cleanup {
        #[serde(default)]
        days: Option<i64>,
    },
}

impl SessionCommand {
    /// Whether this command requires admin authorization
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::RevokeSession { .. } | Self::RevokeUserSessions { .. } | Self::Cleanup { .. }
        )
    }
}

/// Result of a dispatched session command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// A session was created
    Stored { session_id: String },

    /// An access token was issued
    Refreshed { grant: AccessGrant },

    /// The session (if any) was cleared
    Cleared,

    /// Admin revocation of a single session
    Revoked { found: bool },

    /// Admin revocation of a user's sessions
    RevokedForUser { count: u64 },

    /// Retention sweep finished
    CleanedUp { deleted: u64 },
}

impl<R, P> SessionService<R, P>
where
    R: SessionRepository,
    P: IdentityProvider,
{
    /// Execute a command against the service
    ///
    /// Admin authorization happens before dispatch; by the time a
    /// command reaches here it is allowed to run.
    pub async fn dispatch(&self, command: SessionCommand) -> SessionResult<SessionOutcome> {
        match command {
            SessionCommand::StoreRefresh {
                user_id,
                refresh_token,
            } => {
                let session_id = self.store_refresh(&user_id, &refresh_token).await?;
                Ok(SessionOutcome::Stored { session_id })
            }
            SessionCommand::Refresh { session_id } => {
                let grant = self.refresh(&session_id).await?;
                Ok(SessionOutcome::Refreshed { grant })
            }
            SessionCommand::ClearRefresh { session_id } => {
                self.clear_refresh(session_id.as_deref()).await?;
                Ok(SessionOutcome::Cleared)
            }
            SessionCommand::RevokeSession { session_id } => {
                let found = self.revoke_session(&session_id).await?;
                Ok(SessionOutcome::Revoked { found })
            }
            SessionCommand::RevokeUserSessions { user_id } => {
                let count = self.revoke_user_sessions(&user_id).await?;
                Ok(SessionOutcome::RevokedForUser { count })
            }
            SessionCommand::Cleanup { days } => {
                let deleted = self.cleanup_sessions(days).await?;
                Ok(SessionOutcome::CleanedUp { deleted })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::repositories::MockSessionRepository;
    use crate::services::cipher::TokenCipher;
    use crate::services::provider::stub::StubIdentityProvider;
    use crate::services::provider::ProviderTokens;
    use crate::services::session::service::SessionServiceConfig;

    use super::*;

    fn service() -> SessionService<MockSessionRepository, StubIdentityProvider> {
        SessionService::new(
            Arc::new(MockSessionRepository::new()),
            Arc::new(StubIdentityProvider::accepting(ProviderTokens {
                access_token: "at-1".to_string(),
                refresh_token: None,
                expires_at: 2_000_000_000,
            })),
            TokenCipher::new("unit-test-secret").unwrap(),
            SessionServiceConfig::default(),
        )
    }

    #[test]
    fn test_command_wire_format() {
        let command: SessionCommand = serde_json::from_str(
            r#"{"action":"store_refresh","user_id":"user-1","refresh_token":"rt-abc"}"#,
        )
        .unwrap();
        assert_eq!(
            command,
            SessionCommand::StoreRefresh {
                user_id: "user-1".to_string(),
                refresh_token: "rt-abc".to_string(),
            }
        );

        // Optional fields may be omitted entirely
        let command: SessionCommand =
            serde_json::from_str(r#"{"action":"clear_refresh"}"#).unwrap();
        assert_eq!(command, SessionCommand::ClearRefresh { session_id: None });

        let command: SessionCommand = serde_json::from_str(r#"{"action":"cleanup"}"#).unwrap();
        assert_eq!(command, SessionCommand::Cleanup { days: None });
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: Result<SessionCommand, _> =
            serde_json::from_str(r#"{"action":"drop_all_tables"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_admin_commands_are_flagged() {
        assert!(SessionCommand::Cleanup { days: None }.is_admin());
        assert!(SessionCommand::RevokeSession {
            session_id: "s".to_string()
        }
        .is_admin());
        assert!(SessionCommand::RevokeUserSessions {
            user_id: "u".to_string()
        }
        .is_admin());
        assert!(!SessionCommand::Refresh {
            session_id: "s".to_string()
        }
        .is_admin());
        assert!(!SessionCommand::ClearRefresh { session_id: None }.is_admin());
    }

    #[tokio::test]
    async fn test_dispatch_store_then_refresh() {
        let svc = service();

        let outcome = svc
            .dispatch(SessionCommand::StoreRefresh {
                user_id: "user-1".to_string(),
                refresh_token: "rt-abc".to_string(),
            })
            .await
            .unwrap();
        let SessionOutcome::Stored { session_id } = outcome else {
            panic!("expected Stored outcome");
        };

        let outcome = svc
            .dispatch(SessionCommand::Refresh { session_id })
            .await
            .unwrap();
        let SessionOutcome::Refreshed { grant } = outcome else {
            panic!("expected Refreshed outcome");
        };
        assert_eq!(grant.access_token, "at-1");
    }

    #[tokio::test]
    async fn test_dispatch_admin_commands() {
        let svc = service();
        let outcome = svc
            .dispatch(SessionCommand::RevokeUserSessions {
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(outcome, SessionOutcome::RevokedForUser { count: 0 });

        let outcome = svc
            .dispatch(SessionCommand::Cleanup { days: Some(30) })
            .await
            .unwrap();
        assert_eq!(outcome, SessionOutcome::CleanedUp { deleted: 0 });
    }
}
