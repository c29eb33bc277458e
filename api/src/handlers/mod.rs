//! Response handlers shared across routes.

pub mod error_handler;

pub use error_handler::handle_session_error;
