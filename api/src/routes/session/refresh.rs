use actix_web::{web, HttpRequest, HttpResponse};

use sv_core::errors::SessionError;
use sv_core::repositories::SessionRepository;
use sv_core::services::provider::IdentityProvider;
use sv_core::services::session::SessionCommand;

use crate::cookies::session_id_from_request;
use crate::handlers::handle_session_error;

use super::{respond, AppState};

/// Handler for POST /api/v1/session/refresh
///
/// Exchanges the session cookie for a fresh access token. The response
/// body carries only the access token and its expiry.
///
/// # Response (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "expires_at": 1700000000
/// }
/// ```
///
/// # Errors
/// - 401 Unauthorized: No cookie, or the session is unknown, revoked, or expired
/// - 500 Internal Server Error: Store or provider outage
pub async fn refresh<R, P>(
    state: web::Data<AppState<R, P>>,
    request: HttpRequest,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    let Some(session_id) = session_id_from_request(&request) else {
        return handle_session_error(SessionError::MissingSession);
    };

    let command = SessionCommand::Refresh { session_id };
    match state.session_service.dispatch(command).await {
        Ok(outcome) => respond(outcome, state.cookie_secure),
        Err(error) => handle_session_error(error),
    }
}
