//! Background retention sweep for session records.
//!
//! Deleting stale sessions is not security critical (revoked and
//! expired sessions already refuse refresh); the sweep exists to keep
//! the store from growing without bound.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use sv_shared::config::vault::CleanupConfig;

use crate::errors::SessionResult;
use crate::repositories::SessionRepository;
use crate::services::provider::IdentityProvider;
use crate::services::session::service::SessionService;

/// Periodic cleanup task over a session service
pub struct SessionCleanupTask<R, P>
where
    R: SessionRepository,
    P: IdentityProvider,
{
    service: Arc<SessionService<R, P>>,
    config: CleanupConfig,
}

impl<R, P> SessionCleanupTask<R, P>
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    /// Create a cleanup task
    pub fn new(service: Arc<SessionService<R, P>>, config: CleanupConfig) -> Self {
        Self { service, config }
    }

    /// Run a single sweep with the configured retention window
    pub async fn run_once(&self) -> SessionResult<u64> {
        self.service.cleanup_sessions(None).await
    }

    /// Spawn the periodic sweep onto the runtime
    ///
    /// The loop never exits on its own; a failed sweep is logged and
    /// retried at the next tick.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        let interval = Duration::from_secs(self.config.interval_seconds.max(1));
        info!(
            interval_seconds = interval.as_secs(),
            "session cleanup task started"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup is
            // not dominated by a sweep
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match self.run_once().await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            info!(deleted, "cleanup sweep deleted stale sessions");
                        }
                    }
                    Err(err) => error!(error = %err, "cleanup sweep failed"),
                }
            }
        })
    }
}
