use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::auth::{
  entities::UserProvider,
  errors::{AuthError, RepositoryError},
  ports::UserProviderRepository,
  value_objects::ProviderKind,
};

/// PostgreSQL implementation of the UserProviderRepository trait
pub struct PostgresUserProviderRepository {
  pool: PgPool,
}

impl PostgresUserProviderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for user_providers table
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProviderRow {
  id: Uuid,
  user_id: Uuid,
  provider: String,
  provider_key: String,
  password_hash: Option<String>,
  created_at: DateTime<Utc>,
}

impl TryFrom<ProviderRow> for UserProvider {
  type Error = AuthError;

  fn try_from(row: ProviderRow) -> Result<Self, Self::Error> {
    let provider = row.provider.parse::<ProviderKind>().map_err(|_| {
      AuthError::Repository(RepositoryError::InvalidData(format!(
        "unknown provider kind '{}'",
        row.provider
      )))
    })?;

    Ok(UserProvider::from_db(
      row.id,
      row.user_id,
      provider,
      row.provider_key,
      row.password_hash,
      row.created_at,
    ))
  }
}

/// Inserts a binding on an existing connection or transaction
pub(super) async fn insert_provider(
  conn: &mut PgConnection,
  provider: &UserProvider,
) -> Result<ProviderRow, AuthError> {
  let row = sqlx::query_as::<_, ProviderRow>(
    r#"
            INSERT INTO user_providers (id, user_id, provider, provider_key, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, provider, provider_key, password_hash, created_at
            "#,
  )
  .bind(provider.id)
  .bind(provider.user_id)
  .bind(provider.provider.as_str())
  .bind(&provider.provider_key)
  .bind(provider.password_hash.as_deref())
  .bind(provider.created_at)
  .fetch_one(conn)
  .await?;

  Ok(row)
}

#[async_trait]
impl UserProviderRepository for PostgresUserProviderRepository {
  async fn find_by_provider_key(
    &self,
    provider: &ProviderKind,
    provider_key: &str,
  ) -> Result<Option<UserProvider>, AuthError> {
    let row = sqlx::query_as::<_, ProviderRow>(
      r#"
            SELECT id, user_id, provider, provider_key, password_hash, created_at
            FROM user_providers
            WHERE provider = $1 AND provider_key = $2
            "#,
    )
    .bind(provider.as_str())
    .bind(provider_key)
    .fetch_optional(&self.pool)
    .await?;

    row.map(UserProvider::try_from).transpose()
  }

  async fn create(&self, provider: UserProvider) -> Result<UserProvider, AuthError> {
    let mut conn = self.pool.acquire().await?;
    UserProvider::try_from(insert_provider(&mut conn, &provider).await?)
  }
}
