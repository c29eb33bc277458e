//! AES-256-GCM cipher for refresh tokens at rest.
//!
//! Wire format of a sealed blob, before base64:
//!
//! ```text
//! [ nonce (12 bytes) | tag (16 bytes) | ciphertext (n bytes) ]
//! ```
//!
//! The key is derived from the configured secret with SHA-256, so any
//! non-empty secret string yields a full-length key. A fresh random
//! nonce is drawn per encryption; sealing the same token twice never
//! produces the same blob.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use sv_shared::errors::ConfigError;

use crate::errors::TokenCipherError;

/// AES-GCM nonce size in bytes
const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes
const TAG_SIZE: usize = 16;

/// Encrypts and decrypts refresh tokens
#[derive(Clone)]
pub struct TokenCipher {
    key: [u8; 32],
}

impl TokenCipher {
    /// Create a cipher from the configured secret
    ///
    /// Fails when the secret is empty or whitespace. There is no
    /// plaintext fallback; a deployment without a usable secret must
    /// not start.
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::invalid(
                "SESSION_ENCRYPTION_SECRET",
                "secret must not be empty",
            ));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&Sha256::digest(secret.as_bytes()));
        Ok(Self { key })
    }

    /// Encrypt a refresh token into a base64 blob
    pub fn encrypt(&self, plaintext: &str) -> Result<String, TokenCipherError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        // The AEAD output is ciphertext with the tag appended
        let sealed = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| TokenCipherError::EncryptionFailed {
                message: "AES-GCM encryption failed".to_string(),
            })?;
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_SIZE);

        let mut blob = Vec::with_capacity(NONCE_SIZE + TAG_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(tag);
        blob.extend_from_slice(ciphertext);

        Ok(BASE64.encode(blob))
    }

    /// Decrypt a base64 blob back into the refresh token
    ///
    /// Any failure collapses to `DecryptionFailed`: a malformed blob, a
    /// forged tag, and a key mismatch are indistinguishable to callers.
    pub fn decrypt(&self, blob: &str) -> Result<String, TokenCipherError> {
        let bytes = BASE64
            .decode(blob)
            .map_err(|_| TokenCipherError::DecryptionFailed)?;
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(TokenCipherError::DecryptionFailed);
        }

        let (nonce_bytes, rest) = bytes.split_at(NONCE_SIZE);
        let (tag, ciphertext) = rest.split_at(TAG_SIZE);

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed.as_ref())
            .map_err(|_| TokenCipherError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| TokenCipherError::DecryptionFailed)
    }
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher").finish_non_exhaustive()
    }
}
