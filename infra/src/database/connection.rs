//! PostgreSQL connection pool setup.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use sv_shared::config::database::DatabaseConfig;

/// Create a connection pool from the database configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "database pool created"
    );
    Ok(pool)
}
