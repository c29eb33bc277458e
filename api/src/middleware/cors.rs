//! CORS middleware configuration for cross-origin requests.
//!
//! The session cookie is the authentication credential, so credential
//! support stays on in every environment and production origins must
//! be listed explicitly. A wildcard origin with credentials would be
//! refused by browsers anyway.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use sv_shared::config::environment::Environment;

/// Creates a CORS middleware instance for the given environment.
///
/// Development allows any origin for easy local testing. Production
/// restricts origins to the `ALLOWED_ORIGINS` list.
///
/// # Environment Variables
/// - `ALLOWED_ORIGINS`: Comma-separated list of allowed origins (production only)
/// - `CORS_MAX_AGE`: Max age for preflight cache (default: 3600 seconds)
pub fn create_cors(environment: Environment) -> Cors {
    let max_age = std::env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(3600);

    if environment.is_production() {
        create_production_cors(max_age)
    } else {
        create_development_cors(max_age)
    }
}

fn allowed_methods() -> Vec<Method> {
    vec![Method::GET, Method::POST, Method::OPTIONS]
}

fn allowed_headers() -> Vec<header::HeaderName> {
    vec![
        header::AUTHORIZATION,
        header::ACCEPT,
        header::CONTENT_TYPE,
        header::ORIGIN,
    ]
}

fn create_development_cors(max_age: usize) -> Cors {
    info!("configuring CORS for development environment");

    Cors::permissive()
        .allowed_methods(allowed_methods())
        .allowed_headers(allowed_headers())
        .max_age(max_age)
        .supports_credentials()
}

fn create_production_cors(max_age: usize) -> Cors {
    info!("configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(allowed_headers())
        .max_age(max_age)
        .supports_credentials();

    if let Ok(allowed_origins) = std::env::var("ALLOWED_ORIGINS") {
        for origin in allowed_origins.split(',').map(|s| s.trim()) {
            if !origin.is_empty() {
                info!(origin, "adding allowed origin");
                cors = cors.allowed_origin(origin);
            }
        }
    }

    cors
}
