//! Specific error types for the cipher, the session store, and the
//! identity provider client.
//!
//! Variants are deliberately coarse. Client-facing surfaces only ever
//! see the generic message of the umbrella error; the detail captured
//! here is for logs.

use thiserror::Error;

/// Token cipher errors
#[derive(Error, Debug)]
pub enum TokenCipherError {
    /// Encryption failed. Carries detail because encryption failures
    /// indicate a broken deployment, not bad input.
    #[error("Token encryption failed: {message}")]
    EncryptionFailed { message: String },

    /// Decryption failed. Carries no detail: the blob was malformed,
    /// tampered with, or sealed under a different key, and the three
    /// cases are indistinguishable by contract.
    #[error("Token decryption failed")]
    DecryptionFailed,
}

/// Session store errors
#[derive(Error, Debug)]
pub enum SessionStoreError {
    /// Insert hit an existing session id
    #[error("Session id already exists")]
    DuplicateSessionId,

    /// The backing store could not serve the request
    #[error("Session store unavailable: {message}")]
    Unavailable { message: String },
}

impl SessionStoreError {
    /// Shorthand for wrapping a backend failure
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Identity provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider answered and declined the refresh token
    #[error("Identity provider rejected the refresh token")]
    Rejected,

    /// The provider could not be reached or answered garbage
    #[error("Identity provider unreachable: {message}")]
    Unreachable { message: String },
}

impl ProviderError {
    /// Shorthand for wrapping a transport failure
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }
}
