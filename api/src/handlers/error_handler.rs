//! Mapping from domain errors to HTTP responses.
//!
//! Clients always receive a generic message for a status class. The
//! specific cause (store outage, provider outage, cipher failure) goes
//! to the logs only.

use actix_web::HttpResponse;
use tracing::error;

use sv_core::errors::SessionError;
use sv_shared::types::ErrorResponse;

/// Convert a session error into the HTTP response for it
pub fn handle_session_error(error: SessionError) -> HttpResponse {
    match error {
        SessionError::Validation { field } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(format!("Invalid value for {field}"))),
        SessionError::MissingSession | SessionError::InvalidSession => {
            HttpResponse::Unauthorized().json(ErrorResponse::new("Invalid or expired session"))
        }
        SessionError::AdminForbidden => {
            HttpResponse::Forbidden().json(ErrorResponse::new("Admin authorization required"))
        }
        other => {
            error!(error = %other, "session operation failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}
