use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{entities::UserProfile, errors::AuthError, ports::UserProfileRepository};

/// PostgreSQL implementation of the UserProfileRepository trait
pub struct PostgresUserProfileRepository {
  pool: PgPool,
}

impl PostgresUserProfileRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
  id: Uuid,
  user_id: Uuid,
  name: String,
  avatar_url: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
  fn from(row: ProfileRow) -> Self {
    UserProfile::from_db(
      row.id,
      row.user_id,
      row.name,
      row.avatar_url,
      row.created_at,
      row.updated_at,
    )
  }
}

#[async_trait]
impl UserProfileRepository for PostgresUserProfileRepository {
  /// Creates a profile; a second profile for the same user is a `DuplicateKey`
  async fn create(&self, profile: UserProfile) -> Result<UserProfile, AuthError> {
    let row = sqlx::query_as::<_, ProfileRow>(
      r#"
            INSERT INTO user_profiles (id, user_id, name, avatar_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, avatar_url, created_at, updated_at
            "#,
    )
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(&profile.name)
    .bind(profile.avatar_url.as_deref())
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, AuthError> {
    let row = sqlx::query_as::<_, ProfileRow>(
      r#"
            SELECT id, user_id, name, avatar_url, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }
}
