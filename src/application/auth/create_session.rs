use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::DeviceInfo;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::{AuthService, NewSession};
use crate::domain::auth::value_objects::RefreshToken;

/// Command for persisting a login session
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
  pub user_id: Uuid,
  /// Caller-supplied refresh token, stored hashed
  pub refresh_token: String,
  pub user_agent: Option<String>,
  pub ip_address: Option<IpAddr>,
  /// `None` creates a session that never expires
  pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateSessionResponse {
  pub session_id: Uuid,
  pub expires_at: Option<DateTime<Utc>>,
}

/// Use case for creating a session from caller-supplied values
pub struct CreateSessionUseCase {
  auth_service: Arc<AuthService>,
}

impl CreateSessionUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  pub async fn execute(
    &self,
    command: CreateSessionCommand,
  ) -> Result<CreateSessionResponse, AuthError> {
    let refresh_token = RefreshToken::new(command.refresh_token)?;

    let session = self
      .auth_service
      .create_session(NewSession {
        user_id: command.user_id,
        refresh_token,
        device: DeviceInfo {
          user_agent: command.user_agent,
          ip_address: command.ip_address,
        },
        expires_at: command.expires_at,
      })
      .await?;

    Ok(CreateSessionResponse {
      session_id: session.id,
      expires_at: session.expires_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::ValidationError;
  use crate::domain::auth::services::tests::test_service;

  #[tokio::test]
  async fn test_create_session_without_expiry() {
    let (service, repo) = test_service();

    let response = CreateSessionUseCase::new(service)
      .execute(CreateSessionCommand {
        user_id: Uuid::new_v4(),
        refresh_token: "caller-token".to_string(),
        user_agent: None,
        ip_address: None,
        expires_at: None,
      })
      .await
      .unwrap();

    assert!(response.expires_at.is_none());
    assert_eq!(repo.session_count().await, 1);
  }

  #[tokio::test]
  async fn test_create_session_rejects_empty_token() {
    let (service, repo) = test_service();

    let result = CreateSessionUseCase::new(service)
      .execute(CreateSessionCommand {
        user_id: Uuid::new_v4(),
        refresh_token: String::new(),
        user_agent: None,
        ip_address: None,
        expires_at: None,
      })
      .await;

    assert!(matches!(
      result,
      Err(AuthError::Validation(ValidationError::MissingField { .. }))
    ));
    assert_eq!(repo.session_count().await, 0);
  }
}
