//! Database module - PostgreSQL implementations using SQLx
//!
//! - Connection pool management
//! - Session repository implementation

pub mod connection;
pub mod postgres;

// Re-export commonly used types
pub use connection::create_pool;
pub use postgres::PgSessionRepository;
