use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::RefreshToken;

#[derive(Debug, Clone)]
pub struct RefreshAccessTokenCommand {
  pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct RefreshAccessTokenResponse {
  pub user_id: Uuid,
  pub access_token: String,
}

/// Use case for trading a refresh token for a new access token
///
/// The refresh token itself is not rotated.
pub struct RefreshAccessTokenUseCase {
  auth_service: Arc<AuthService>,
}

impl RefreshAccessTokenUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  pub async fn execute(
    &self,
    command: RefreshAccessTokenCommand,
  ) -> Result<RefreshAccessTokenResponse, AuthError> {
    let refresh_token =
      RefreshToken::new(command.refresh_token).map_err(|_| AuthError::InvalidSession)?;

    let (session, access_token) = self.auth_service.refresh(&refresh_token).await?;

    Ok(RefreshAccessTokenResponse {
      user_id: session.user_id,
      access_token,
    })
  }
}
