//! Admin route handlers
//!
//! Every handler here checks the admin gate before dispatching. A
//! denial is a plain 403 with no hint about which credential path
//! failed.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sv_core::repositories::SessionRepository;
use sv_core::services::provider::IdentityProvider;
use sv_core::services::session::SessionCommand;

use crate::dto::{CleanupRequest, RevokeSessionRequest, RevokeUserRequest};
use crate::handlers::handle_session_error;

use super::{require_admin, respond, validation_failure, AppState};

/// Handler for POST /api/v1/session/admin/revoke
///
/// Revokes a single session by id. Reports whether a session actually
/// transitioned, so operators can tell a hit from a no-op.
pub async fn revoke_session<R, P>(
    state: web::Data<AppState<R, P>>,
    http_request: HttpRequest,
    request: web::Json<RevokeSessionRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    if let Err(response) = require_admin(&state, &http_request) {
        return response;
    }
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    let command = SessionCommand::RevokeSession {
        session_id: request.session_id.clone(),
    };
    match state.session_service.dispatch(command).await {
        Ok(outcome) => respond(outcome, state.cookie_secure),
        Err(error) => handle_session_error(error),
    }
}

/// Handler for POST /api/v1/session/admin/revoke-user
///
/// Revokes every active session of a user, e.g. on account compromise.
pub async fn revoke_user_sessions<R, P>(
    state: web::Data<AppState<R, P>>,
    http_request: HttpRequest,
    request: web::Json<RevokeUserRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    if let Err(response) = require_admin(&state, &http_request) {
        return response;
    }
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    let command = SessionCommand::RevokeUserSessions {
        user_id: request.user_id.clone(),
    };
    match state.session_service.dispatch(command).await {
        Ok(outcome) => respond(outcome, state.cookie_secure),
        Err(error) => handle_session_error(error),
    }
}

/// Handler for POST /api/v1/session/admin/cleanup
///
/// Deletes sessions older than the retention window. The body may
/// override the window; omitting it uses the configured default.
pub async fn cleanup<R, P>(
    state: web::Data<AppState<R, P>>,
    http_request: HttpRequest,
    request: web::Json<CleanupRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    if let Err(response) = require_admin(&state, &http_request) {
        return response;
    }

    let command = SessionCommand::Cleanup { days: request.days };
    match state.session_service.dispatch(command).await {
        Ok(outcome) => respond(outcome, state.cookie_secure),
        Err(error) => handle_session_error(error),
    }
}
