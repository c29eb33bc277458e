use actix_web::{web, HttpResponse};
use validator::Validate;

use sv_core::repositories::SessionRepository;
use sv_core::services::provider::IdentityProvider;
use sv_core::services::session::SessionCommand;

use crate::dto::StoreRefreshRequest;
use crate::handlers::handle_session_error;

use super::{respond, validation_failure, AppState};

/// Handler for POST /api/v1/session/store
///
/// Called by the login flow after the identity provider has issued
/// tokens. Encrypts and stores the refresh token server-side and sets
/// the session cookie; the refresh token itself never reaches the
/// browser.
///
/// # Errors
/// - 400 Bad Request: Empty user id or refresh token
/// - 500 Internal Server Error: Store failure or exhausted id retries
pub async fn store<R, P>(
    state: web::Data<AppState<R, P>>,
    request: web::Json<StoreRefreshRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    let command = SessionCommand::StoreRefresh {
        user_id: request.user_id.clone(),
        refresh_token: request.refresh_token.clone(),
    };
    match state.session_service.dispatch(command).await {
        Ok(outcome) => respond(outcome, state.cookie_secure),
        Err(error) => handle_session_error(error),
    }
}
