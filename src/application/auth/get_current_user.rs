use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Response containing the current user's information
#[derive(Debug, Clone)]
pub struct GetCurrentUserResponse {
  pub user_id: Uuid,
  pub email: String,
  /// Display name from the profile, if any
  pub name: Option<String>,
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Use case for getting the current authenticated user
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<GetCurrentUserResponse, AuthError> {
    let (user, profile) = self.auth_service.current_user(user_id).await?;
    let (name, avatar_url) = match profile {
      Some(profile) => (Some(profile.name), profile.avatar_url),
      None => (None, None),
    };

    Ok(GetCurrentUserResponse {
      user_id: user.id,
      email: user.email,
      name,
      avatar_url,
      created_at: user.created_at,
    })
  }
}
