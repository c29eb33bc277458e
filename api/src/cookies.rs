//! Session cookie construction.
//!
//! The cookie value is the opaque session id and nothing else. Both
//! the issue and clear paths share one attribute set; only Max-Age
//! differs, and the Secure flag follows the deployment environment.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "sv_session";

/// Session cookie lifetime, in days
pub const SESSION_COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Build the session cookie for a freshly stored session
pub fn session_cookie(session_id: &str, secure: bool) -> Cookie<'static> {
    base_cookie(session_id.to_string(), secure)
        .max_age(Duration::days(SESSION_COOKIE_MAX_AGE_DAYS))
        .finish()
}

/// Build the expired cookie that clears the session on the client
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    base_cookie(String::new(), secure)
        .max_age(Duration::seconds(0))
        .finish()
}

fn base_cookie(value: String, secure: bool) -> actix_web::cookie::CookieBuilder<'static> {
    Cookie::build(SESSION_COOKIE_NAME, value)
        .http_only(true)
        .path("/")
        .same_site(SameSite::Strict)
        .secure(secure)
}

/// Extract the session id from the request cookie, if present
pub fn session_id_from_request(request: &HttpRequest) -> Option<String> {
    request
        .cookie(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
