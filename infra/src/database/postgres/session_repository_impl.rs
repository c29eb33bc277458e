//! PostgreSQL implementation of the session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

use sv_core::domain::entities::session::SessionRecord;
use sv_core::errors::SessionStoreError;
use sv_core::repositories::SessionRepository;

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Session repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a SessionRecord entity
    fn row_to_record(row: &PgRow) -> Result<SessionRecord, sqlx::Error> {
        Ok(SessionRecord {
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            encrypted_refresh_token: row.try_get("encrypted_refresh_token")?,
            created_at: row.try_get("created_at")?,
            last_used_at: row.try_get("last_used_at")?,
            revoked: row.try_get("revoked")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    fn map_error(error: sqlx::Error) -> SessionStoreError {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return SessionStoreError::DuplicateSessionId;
            }
        }
        SessionStoreError::unavailable(error.to_string())
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, record: SessionRecord) -> Result<(), SessionStoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id, user_id, encrypted_refresh_token,
                created_at, last_used_at, revoked, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.session_id)
        .bind(&record.user_id)
        .bind(&record.encrypted_refresh_token)
        .bind(record.created_at)
        .bind(record.last_used_at)
        .bind(record.revoked)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(Self::map_error)?;

        debug!("session record inserted");
        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionRecord>, SessionStoreError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, user_id, encrypted_refresh_token,
                   created_at, last_used_at, revoked, expires_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_error)?;

        row.map(|r| Self::row_to_record(&r))
            .transpose()
            .map_err(Self::map_error)
    }

    async fn mark_revoked(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked = TRUE
            WHERE session_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_revoked_for_user(&self, user_id: &str) -> Result<u64, SessionStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked = TRUE
            WHERE user_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(result.rows_affected())
    }

    async fn update_after_refresh(
        &self,
        session_id: &str,
        last_used_at: DateTime<Utc>,
        new_encrypted_token: Option<&str>,
    ) -> Result<(), SessionStoreError> {
        // COALESCE keeps the stored token when the provider did not rotate
        sqlx::query(
            r#"
            UPDATE sessions
            SET last_used_at = $2,
                encrypted_refresh_token = COALESCE($3, encrypted_refresh_token)
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(last_used_at)
        .bind(new_encrypted_token)
        .execute(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionStoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE created_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(result.rows_affected())
    }
}
