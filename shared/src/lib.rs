//! Shared utilities and common types for the SessionVault server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error types and response structures
//! - Common type definitions

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    CleanupConfig, DatabaseConfig, Environment, ProviderConfig, ServerConfig, VaultConfig,
};
pub use errors::ConfigError;
pub use types::{ApiResponse, ErrorResponse};
