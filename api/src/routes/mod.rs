//! Route handlers for the session API.

pub mod session;

pub use session::AppState;
