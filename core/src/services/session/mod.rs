//! Session lifecycle service and its supporting pieces.
//!
//! - `service` - Protocol operations over the repository, cipher, and provider
//! - `command` - Serializable command envelope dispatched to the service
//! - `cleanup` - Background retention sweep

pub mod cleanup;
pub mod command;
pub mod service;

pub use cleanup::SessionCleanupTask;
pub use command::{SessionCommand, SessionOutcome};
pub use service::{SessionService, SessionServiceConfig};
