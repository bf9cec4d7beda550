use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::RefreshToken;

#[derive(Debug, Clone)]
pub struct LogoutUserCommand {
  pub refresh_token: String,
}

/// Use case for logging out a user by revoking the current session
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Revokes the session; the row is kept with its revocation timestamp
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if no session holds the token
  pub async fn execute(&self, command: LogoutUserCommand) -> Result<(), AuthError> {
    let refresh_token =
      RefreshToken::new(command.refresh_token).map_err(|_| AuthError::InvalidSession)?;

    self.auth_service.logout(&refresh_token).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::{
    CreateSessionCommand, CreateSessionUseCase, RefreshAccessTokenCommand,
    RefreshAccessTokenUseCase,
  };
  use crate::domain::auth::services::tests::test_service;
  use uuid::Uuid;

  #[tokio::test]
  async fn test_logout_revokes_session() {
    let (service, repo) = test_service();
    CreateSessionUseCase::new(service.clone())
      .execute(CreateSessionCommand {
        user_id: Uuid::new_v4(),
        refresh_token: "to-revoke".to_string(),
        user_agent: None,
        ip_address: None,
        expires_at: None,
      })
      .await
      .unwrap();

    LogoutUserUseCase::new(service.clone())
      .execute(LogoutUserCommand {
        refresh_token: "to-revoke".to_string(),
      })
      .await
      .unwrap();

    let result = RefreshAccessTokenUseCase::new(service)
      .execute(RefreshAccessTokenCommand {
        refresh_token: "to-revoke".to_string(),
      })
      .await;

    assert!(matches!(result, Err(AuthError::InvalidSession)));
    assert_eq!(repo.session_count().await, 1);
  }

  #[tokio::test]
  async fn test_logout_unknown_token() {
    let (service, _) = test_service();

    let result = LogoutUserUseCase::new(service)
      .execute(LogoutUserCommand {
        refresh_token: "unknown".to_string(),
      })
      .await;

    assert!(matches!(result, Err(AuthError::InvalidSession)));
  }
}
