//! Identity provider abstraction.
//!
//! The session layer never mints tokens itself. Refreshing goes
//! through this trait; the HTTP client in the infrastructure crate is
//! the production implementation, and tests substitute stubs.

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Tokens returned by the identity provider for a refresh
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTokens {
    /// New access token
    pub access_token: String,

    /// Rotated refresh token, when the provider rotates
    pub refresh_token: Option<String>,

    /// Absolute expiry of the access token, as a Unix timestamp
    pub expires_at: i64,
}

/// Client for the upstream identity provider's token endpoint
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a refresh token for fresh tokens
    ///
    /// # Returns
    /// * `Ok(ProviderTokens)` - The provider accepted the token
    /// * `Err(ProviderError::Rejected)` - The provider declined it
    /// * `Err(ProviderError::Unreachable)` - Transport or protocol failure
    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens, ProviderError>;
}

#[cfg(test)]
pub mod stub {
    //! Scriptable provider stub for unit tests.

    use std::sync::Arc;

    use tokio::sync::RwLock;

    use super::*;

    /// Provider stub returning a preconfigured response
    #[derive(Clone)]
    pub struct StubIdentityProvider {
        response: Arc<RwLock<Result<ProviderTokens, ProviderErrorKind>>>,
        calls: Arc<RwLock<Vec<String>>>,
    }

    #[derive(Clone, Copy)]
    enum ProviderErrorKind {
        Rejected,
        Unreachable,
    }

    impl StubIdentityProvider {
        /// Stub that accepts every token and answers with the given tokens
        pub fn accepting(tokens: ProviderTokens) -> Self {
            Self {
                response: Arc::new(RwLock::new(Ok(tokens))),
                calls: Arc::new(RwLock::new(Vec::new())),
            }
        }

        /// Stub that rejects every token
        pub fn rejecting() -> Self {
            Self {
                response: Arc::new(RwLock::new(Err(ProviderErrorKind::Rejected))),
                calls: Arc::new(RwLock::new(Vec::new())),
            }
        }

        /// Stub that is unreachable
        pub fn unreachable() -> Self {
            Self {
                response: Arc::new(RwLock::new(Err(ProviderErrorKind::Unreachable))),
                calls: Arc::new(RwLock::new(Vec::new())),
            }
        }

        /// Change the scripted response
        pub async fn respond_with(&self, tokens: ProviderTokens) {
            *self.response.write().await = Ok(tokens);
        }

        /// Refresh tokens the stub has been called with, in order
        pub async fn calls(&self) -> Vec<String> {
            self.calls.read().await.clone()
        }
    }

    #[async_trait]
    impl IdentityProvider for StubIdentityProvider {
        async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens, ProviderError> {
            self.calls.write().await.push(refresh_token.to_string());
            match &*self.response.read().await {
                Ok(tokens) => Ok(tokens.clone()),
                Err(ProviderErrorKind::Rejected) => Err(ProviderError::Rejected),
                Err(ProviderErrorKind::Unreachable) => {
                    Err(ProviderError::unreachable("stubbed outage"))
                }
            }
        }
    }
}
