//! Token encryption for refresh tokens at rest.

pub mod token_cipher;

pub use token_cipher::TokenCipher;
