//! HTTP client for the identity provider's token endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sv_core::errors::ProviderError;
use sv_core::services::provider::{IdentityProvider, ProviderTokens};
use sv_shared::config::vault::ProviderConfig;
use sv_shared::errors::ConfigError;

/// Request timeout for provider calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Refresh request body sent to the provider
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Token response returned by the provider
///
/// Providers differ on expiry reporting: some send an absolute
/// `expires_at`, some a relative `expires_in`. Both are accepted and
/// normalized to an absolute timestamp.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl RefreshResponse {
    fn expires_at(&self) -> Option<i64> {
        self.expires_at
            .or_else(|| self.expires_in.map(|secs| Utc::now().timestamp() + secs))
    }
}

/// Identity provider client over HTTP
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl HttpIdentityProvider {
    /// Create a client from the provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "IDENTITY_PROVIDER_URL",
                "value is empty",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::invalid("IDENTITY_PROVIDER_URL", e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    fn token_url(&self) -> String {
        format!("{}/token?grant_type=refresh_token", self.base_url)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens, ProviderError> {
        let response = self
            .client
            .post(self.token_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| ProviderError::unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            // The provider answered and said no; the response body may
            // contain token material, so only the status is logged
            warn!(status = %status, "provider declined refresh");
            return Err(ProviderError::Rejected);
        }
        if !status.is_success() {
            return Err(ProviderError::unreachable(format!(
                "provider returned status {status}"
            )));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::unreachable(e.to_string()))?;

        let Some(expires_at) = body.expires_at() else {
            return Err(ProviderError::unreachable(
                "provider response carried no expiry",
            ));
        };

        debug!("provider refresh succeeded");
        Ok(ProviderTokens {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            expires_at,
        })
    }
}
