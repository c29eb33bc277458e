//! Session vault configuration
//!
//! Everything the session manager consumes from the environment lives
//! here: the encryption secret, the admin credentials, the identity
//! provider endpoint, and retention/cleanup settings.

use serde::{Deserialize, Serialize};

use crate::config::environment::Environment;
use crate::errors::ConfigError;

/// Default retention window for session records, in days
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Identity provider endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of the identity provider's auth API
    pub base_url: String,

    /// Service credential sent with every provider request
    pub service_key: String,
}

/// Background cleanup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Whether the background sweep is enabled
    pub enabled: bool,

    /// How often to run the sweep, in seconds
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: 3600,
        }
    }
}

/// Complete session vault configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VaultConfig {
    /// Secret the token cipher key is derived from. Required: storing
    /// refresh tokens in plaintext is not an acceptable fallback.
    pub encryption_secret: String,

    /// Static admin bearer token. Absent disables the direct-token
    /// admin path.
    #[serde(default)]
    pub admin_token: Option<String>,

    /// HS256 secret for verifying role-bearing admin tokens. Absent
    /// disables the signed-token admin path.
    #[serde(default)]
    pub admin_signing_secret: Option<String>,

    /// Identity provider endpoint and credential
    pub provider: ProviderConfig,

    /// Retention window for the cleanup sweep, in days
    pub retention_days: i64,

    /// Optional hard lifetime for sessions, in days. When set, records
    /// carry an `expires_at` and refuse refresh past it.
    #[serde(default)]
    pub session_ttl_days: Option<i64>,

    /// Background cleanup settings
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Deployment environment (controls the Secure cookie attribute
    /// and whether the in-memory store is permitted)
    pub environment: Environment,
}

impl VaultConfig {
    /// Load the configuration from environment variables
    ///
    /// Fails if `SESSION_ENCRYPTION_SECRET`, `IDENTITY_PROVIDER_URL`,
    /// or `IDENTITY_PROVIDER_KEY` is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let encryption_secret = require_env("SESSION_ENCRYPTION_SECRET")?;
        let provider = ProviderConfig {
            base_url: require_env("IDENTITY_PROVIDER_URL")?,
            service_key: require_env("IDENTITY_PROVIDER_KEY")?,
        };

        let retention_days = std::env::var("SESSION_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETENTION_DAYS);

        let session_ttl_days = std::env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse().ok());

        let cleanup = CleanupConfig {
            enabled: std::env::var("CLEANUP_ENABLED")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            interval_seconds: std::env::var("CLEANUP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        };

        Ok(Self {
            encryption_secret,
            admin_token: optional_env("ADMIN_API_TOKEN"),
            admin_signing_secret: optional_env("ADMIN_SIGNING_SECRET"),
            provider,
            retention_days,
            session_ttl_days,
            cleanup,
            environment: Environment::from_env(),
        })
    }

    /// Whether any admin credential is configured
    ///
    /// When this returns false the admin gate denies every request.
    pub fn has_admin_credentials(&self) -> bool {
        self.admin_token.is_some() || self.admin_signing_secret.is_some()
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| ConfigError::missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(name, "value is empty"));
    }
    Ok(value)
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
