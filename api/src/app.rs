//! Application factory
//!
//! Builds the Actix application from a prepared state, so the server
//! binary and the integration tests construct exactly the same app.

use actix_web::body::MessageBody;
use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use sv_core::repositories::SessionRepository;
use sv_core::services::provider::IdentityProvider;
use sv_shared::config::environment::Environment;
use sv_shared::types::ErrorResponse;

use crate::middleware::cors::create_cors;
use crate::routes::session::{admin, clear, refresh, store, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<R, P>(
    app_state: web::Data<AppState<R, P>>,
    environment: Environment,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    let cors = create_cors(environment);

    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/session")
                    .route("/store", web::post().to(store::store::<R, P>))
                    .route("/refresh", web::post().to(refresh::refresh::<R, P>))
                    .route("/clear", web::post().to(clear::clear::<R, P>))
                    .service(
                        web::scope("/admin")
                            .route("/revoke", web::post().to(admin::revoke_session::<R, P>))
                            .route(
                                "/revoke-user",
                                web::post().to(admin::revoke_user_sessions::<R, P>),
                            )
                            .route("/cleanup", web::post().to(admin::cleanup::<R, P>)),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "session-vault-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("The requested resource was not found"))
}
