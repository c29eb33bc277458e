//! Configuration error types shared across the workspace.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// These are fatal at process startup: no session operation may run
/// without the encryption secret configured.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {name}")]
    Missing { name: String },

    #[error("Invalid configuration for {name}: {message}")]
    Invalid { name: String, message: String },
}

impl ConfigError {
    /// Create a missing-variable error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }

    /// Create an invalid-value error
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            message: message.into(),
        }
    }
}
