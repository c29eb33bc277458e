use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sv_api::app::create_app;
use sv_api::routes::session::AppState;
use sv_core::repositories::SessionRepository;
use sv_core::services::provider::IdentityProvider;
use sv_core::services::session::{SessionCleanupTask, SessionService, SessionServiceConfig};
use sv_core::services::{AdminGate, TokenCipher};
use sv_infra::database::{create_pool, PgSessionRepository};
use sv_infra::memory::InMemorySessionRepository;
use sv_infra::provider::HttpIdentityProvider;
use sv_shared::config::database::DatabaseConfig;
use sv_shared::config::server::ServerConfig;
use sv_shared::config::vault::VaultConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("starting SessionVault API server");

    // A missing encryption secret or provider endpoint aborts startup
    let config = VaultConfig::from_env().context("loading session vault configuration")?;
    let server = ServerConfig::from_env();

    if !config.has_admin_credentials() {
        warn!("no admin credentials configured; the admin surface will deny every request");
    }

    let cipher =
        TokenCipher::new(&config.encryption_secret).context("initializing token cipher")?;
    let provider = Arc::new(
        HttpIdentityProvider::new(&config.provider).context("initializing provider client")?,
    );

    // Postgres when DATABASE_URL is set; otherwise the in-memory store,
    // which itself refuses to run in production
    match DatabaseConfig::from_env() {
        Ok(db_config) => {
            let pool = create_pool(&db_config)
                .await
                .context("connecting to the database")?;
            let repository = Arc::new(PgSessionRepository::new(pool));
            run_server(repository, provider, cipher, config, server).await
        }
        Err(_) => {
            let repository = Arc::new(InMemorySessionRepository::new(config.environment)?);
            run_server(repository, provider, cipher, config, server).await
        }
    }
}

async fn run_server<R, P>(
    repository: Arc<R>,
    provider: Arc<P>,
    cipher: TokenCipher,
    config: VaultConfig,
    server: ServerConfig,
) -> anyhow::Result<()>
where
    R: SessionRepository + 'static,
    P: IdentityProvider + 'static,
{
    let service_config = SessionServiceConfig {
        retention_days: config.retention_days,
        session_ttl_days: config.session_ttl_days,
        ..SessionServiceConfig::default()
    };
    let session_service = Arc::new(SessionService::new(
        repository,
        provider,
        cipher,
        service_config,
    ));

    if config.cleanup.enabled {
        SessionCleanupTask::new(session_service.clone(), config.cleanup.clone()).spawn();
    }

    let admin_gate = AdminGate::new(
        config.admin_token.clone(),
        config.admin_signing_secret.clone(),
    );
    let environment = config.environment;

    let app_state = web::Data::new(AppState {
        session_service,
        admin_gate,
        cookie_secure: environment.is_production(),
    });

    let bind_address = server.bind_address();
    info!(%bind_address, %environment, "server binding");

    HttpServer::new(move || create_app(app_state.clone(), environment))
        .bind(&bind_address)?
        .run()
        .await?;

    Ok(())
}
