use actix_web::{web, HttpRequest, HttpResponse};

use sv_core::repositories::SessionRepository;
use sv_core::services::provider::IdentityProvider;
use sv_core::services::session::SessionCommand;

use crate::cookies::session_id_from_request;
use crate::handlers::handle_session_error;

use super::{respond, AppState};

/// Handler for POST /api/v1/session/clear
///
/// Logout. Revokes the session behind the cookie when one is present
/// and expires the cookie either way, so a client without a valid
/// session still ends up clean.
pub async fn clear<R, P>(state: web::Data<AppState<R, P>>, request: HttpRequest) -> HttpResponse
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    let command = SessionCommand::ClearRefresh {
        session_id: session_id_from_request(&request),
    };
    match state.session_service.dispatch(command).await {
        Ok(outcome) => respond(outcome, state.cookie_secure),
        Err(error) => handle_session_error(error),
    }
}
