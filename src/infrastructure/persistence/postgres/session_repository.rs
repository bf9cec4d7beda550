use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::net::IpAddr;
use uuid::Uuid;

use crate::domain::auth::entities::UserSession;
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::SessionRepository;
use crate::domain::auth::value_objects::TokenHash;

/// Database row structure for user_sessions table
#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: Uuid,
  refresh_token_hash: String,
  user_agent: Option<String>,
  ip_address: Option<String>,
  expires_at: Option<DateTime<Utc>>,
  revoked_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
}

impl From<SessionRow> for UserSession {
  fn from(row: SessionRow) -> Self {
    let ip_address = row
      .ip_address
      .and_then(|ip_str| ip_str.parse::<IpAddr>().ok());

    UserSession::from_db(
      row.id,
      row.user_id,
      row.refresh_token_hash,
      row.user_agent,
      ip_address,
      row.expires_at,
      row.revoked_at,
      row.created_at,
    )
  }
}

/// PostgreSQL implementation of the SessionRepository trait
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  /// Creates a new PostgresSessionRepository with the given connection pool
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: UserSession) -> Result<UserSession, AuthError> {
    let ip_address = session.ip_address.map(|ip| ip.to_string());

    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO user_sessions (id, user_id, refresh_token_hash, user_agent, ip_address, expires_at, revoked_at, created_at)
            VALUES ($1, $2, $3, $4, CAST($5 AS INET), $6, $7, $8)
            RETURNING id, user_id, refresh_token_hash, user_agent, HOST(ip_address) as ip_address, expires_at, revoked_at, created_at
            "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.refresh_token_hash)
    .bind(session.user_agent.as_deref())
    .bind(ip_address.as_deref())
    .bind(session.expires_at)
    .bind(session.revoked_at)
    .bind(session.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.into())
  }

  async fn find_by_refresh_token_hash(
    &self,
    token_hash: &TokenHash,
  ) -> Result<Option<UserSession>, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            SELECT id, user_id, refresh_token_hash, user_agent, HOST(ip_address) as ip_address, expires_at, revoked_at, created_at
            FROM user_sessions
            WHERE refresh_token_hash = $1
            "#,
    )
    .bind(token_hash.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find session by token hash: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.map(Into::into))
  }

  async fn revoke(&self, session_id: Uuid, revoked_at: DateTime<Utc>) -> Result<(), AuthError> {
    // COALESCE keeps the first revocation timestamp
    let result = sqlx::query(
      r#"
            UPDATE user_sessions
            SET revoked_at = COALESCE(revoked_at, $2)
            WHERE id = $1
            "#,
    )
    .bind(session_id)
    .bind(revoked_at)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }

    Ok(())
  }
}
