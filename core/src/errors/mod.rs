//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{ProviderError, SessionStoreError, TokenCipherError};

use sv_shared::errors::ConfigError;
use thiserror::Error;

/// Umbrella error for session operations
///
/// Every protocol operation returns this type. The API layer maps each
/// variant to a status code; internal detail never leaks to clients.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A request field failed validation
    #[error("Validation failed for field: {field}")]
    Validation { field: String },

    /// No session identifier was presented
    #[error("No session presented")]
    MissingSession,

    /// The presented session is unknown, revoked, expired, or its
    /// stored token could not be used
    #[error("Invalid or expired session")]
    InvalidSession,

    /// The caller is not authorized for the admin surface
    #[error("Admin authorization required")]
    AdminForbidden,

    /// A fresh session could not be created
    #[error("Failed to create session")]
    CreationFailed,

    // Bridges to specific error types
    #[error(transparent)]
    Cipher(#[from] TokenCipherError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type SessionResult<T> = Result<T, SessionError>;
