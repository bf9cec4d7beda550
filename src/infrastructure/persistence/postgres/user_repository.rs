use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::user_provider_repository::{ProviderRow, insert_provider};
use crate::domain::auth::{
  entities::{User, UserProvider},
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::{Email, ProviderKind},
};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(row.id, row.email, row.created_at, row.updated_at)
  }
}

const INSERT_USER: &str = r#"
            INSERT INTO users (id, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, created_at, updated_at
            "#;

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(INSERT_USER)
      .bind(user.id)
      .bind(&user.email)
      .bind(user.created_at)
      .bind(user.updated_at)
      .fetch_one(&self.pool)
      .await?;

    Ok(result.into())
  }

  async fn create_with_provider(
    &self,
    user: User,
    provider: UserProvider,
  ) -> Result<(User, UserProvider), AuthError> {
    let mut tx = self.pool.begin().await.map_err(|e| {
      tracing::error!("Failed to begin transaction: {}", e);
      AuthError::Repository(RepositoryError::TransactionFailed(e.to_string()))
    })?;

    let user_row = sqlx::query_as::<_, UserRow>(INSERT_USER)
      .bind(user.id)
      .bind(&user.email)
      .bind(user.created_at)
      .bind(user.updated_at)
      .fetch_one(&mut *tx)
      .await?;

    let provider_row: ProviderRow = insert_provider(&mut *tx, &provider).await?;

    // Dropping the transaction on any error above rolls it back
    tx.commit().await.map_err(|e| {
      tracing::error!("Failed to commit user creation: {}", e);
      AuthError::Repository(RepositoryError::TransactionFailed(e.to_string()))
    })?;

    Ok((user_row.into(), UserProvider::try_from(provider_row)?))
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(result.map(Into::into))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(result.map(Into::into))
  }

  async fn find_by_provider(
    &self,
    provider: &ProviderKind,
    provider_key: &str,
  ) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT u.id, u.email, u.created_at, u.updated_at
            FROM users u
            INNER JOIN user_providers p ON p.user_id = u.id
            WHERE p.provider = $1 AND p.provider_key = $2
            "#,
    )
    .bind(provider.as_str())
    .bind(provider_key)
    .fetch_optional(&self.pool)
    .await?;

    Ok(result.map(Into::into))
  }
}
