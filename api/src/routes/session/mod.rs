//! Session route handlers
//!
//! All handlers build a [`SessionCommand`] and run it through the
//! service's single dispatch path; what differs per route is only how
//! the command is assembled (body, cookie, bearer token) and how the
//! outcome is rendered (cookie issuance on store and clear).

pub mod admin;
pub mod clear;
pub mod refresh;
pub mod store;

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;
use tracing::info;

use sv_core::errors::SessionError;
use sv_core::repositories::SessionRepository;
use sv_core::services::provider::IdentityProvider;
use sv_core::services::session::{SessionOutcome, SessionService};
use sv_core::services::AdminGate;
use sv_shared::types::ApiResponse;

use crate::cookies::{clear_session_cookie, session_cookie};
use crate::handlers::handle_session_error;

/// Shared application state for the session routes
pub struct AppState<R, P>
where
    R: SessionRepository,
    P: IdentityProvider,
{
    pub session_service: Arc<SessionService<R, P>>,
    pub admin_gate: AdminGate,
    pub cookie_secure: bool,
}

/// Render a dispatch outcome as the HTTP response for it
pub(crate) fn respond(outcome: SessionOutcome, cookie_secure: bool) -> HttpResponse {
    match outcome {
        SessionOutcome::Stored { session_id } => HttpResponse::Ok()
            .cookie(session_cookie(&session_id, cookie_secure))
            .json(ApiResponse::success(json!({ "session_id": session_id }))),
        // The refresh body is exactly the grant, nothing more
        SessionOutcome::Refreshed { grant } => HttpResponse::Ok().json(grant),
        SessionOutcome::Cleared => HttpResponse::Ok()
            .cookie(clear_session_cookie(cookie_secure))
            .json(ApiResponse::success(json!({ "cleared": true }))),
        SessionOutcome::Revoked { found } => {
            HttpResponse::Ok().json(ApiResponse::success(json!({ "revoked": found })))
        }
        SessionOutcome::RevokedForUser { count } => {
            HttpResponse::Ok().json(ApiResponse::success(json!({ "revoked_count": count })))
        }
        SessionOutcome::CleanedUp { deleted } => {
            HttpResponse::Ok().json(ApiResponse::success(json!({ "deleted": deleted })))
        }
    }
}

/// Extract a bearer token from the Authorization header
pub(crate) fn bearer_token(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Check the admin gate, returning the denial response on failure
pub(crate) fn require_admin<R, P>(
    state: &AppState<R, P>,
    request: &HttpRequest,
) -> Result<(), HttpResponse>
where
    R: SessionRepository,
    P: IdentityProvider,
{
    let bearer = bearer_token(request);
    let decision = state.admin_gate.authorize(bearer.as_deref());
    if !decision.allowed {
        return Err(handle_session_error(SessionError::AdminForbidden));
    }
    if let Some(identity) = decision.identity {
        info!(admin = %identity, "admin request authorized");
    }
    Ok(())
}

/// Map a request body validation failure to the 400 response for it
pub(crate) fn validation_failure(errors: &validator::ValidationErrors) -> HttpResponse {
    let field = errors
        .field_errors()
        .keys()
        .next()
        .map(|k| k.to_string())
        .unwrap_or_else(|| "request".to_string());
    handle_session_error(SessionError::Validation { field })
}
