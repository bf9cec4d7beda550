use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::DeviceInfo;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  /// Signed bearer access token
  pub access_token: String,
  /// Raw refresh token, handed to the client once and stored only hashed
  pub refresh_token: String,
  /// Session expiration timestamp
  pub expires_at: Option<DateTime<Utc>>,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Arguments
  /// * `command` - The login command containing credentials
  /// * `ip_address` - Optional IP address of the client
  /// * `user_agent` - Optional user agent string from the client
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCredentials` or `AuthError::SocialLoginOnly`
  /// if the credentials do not authenticate a password account
  pub async fn execute(
    &self,
    command: LoginUserCommand,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    // The strength policy applies at registration only
    let password = Password::for_verification(command.password)?;

    let login = self
      .auth_service
      .login(
        email,
        password,
        DeviceInfo {
          user_agent,
          ip_address,
        },
      )
      .await?;

    Ok(LoginUserResponse {
      user_id: login.user_id,
      access_token: login.access_token,
      refresh_token: login.refresh_token.as_str().to_string(),
      expires_at: login.session.expires_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::{RegisterUserCommand, RegisterUserUseCase};
  use crate::domain::auth::services::tests::test_service;
  use chrono::Duration;

  #[tokio::test]
  async fn test_login_opens_thirty_day_session() {
    let (service, repo) = test_service();
    RegisterUserUseCase::new(service.clone())
      .execute(RegisterUserCommand {
        email: "user@example.com".to_string(),
        password: "Valid1Pass!".to_string(),
      })
      .await
      .unwrap();

    let response = LoginUserUseCase::new(service)
      .execute(
        LoginUserCommand {
          email: "USER@example.com".to_string(),
          password: "Valid1Pass!".to_string(),
        },
        Some("192.168.1.10".parse().unwrap()),
        Some("Mozilla/5.0".to_string()),
      )
      .await
      .unwrap();

    assert!(!response.access_token.is_empty());
    assert_eq!(response.refresh_token.len(), 43);

    let expires_at = response.expires_at.unwrap();
    let expected = Utc::now() + Duration::days(30);
    assert!((expires_at - expected).num_seconds().abs() <= 60);
    assert_eq!(repo.session_count().await, 1);
  }

  #[tokio::test]
  async fn test_login_does_not_apply_strength_policy() {
    let (service, _) = test_service();

    let result = LoginUserUseCase::new(service)
      .execute(
        LoginUserCommand {
          email: "user@example.com".to_string(),
          password: "weak".to_string(),
        },
        None,
        None,
      )
      .await;

    // Unknown account, not a policy violation
    assert!(matches!(result, Err(AuthError::SocialLoginOnly)));
  }

  #[tokio::test]
  async fn test_login_with_empty_password() {
    let (service, _) = test_service();

    let result = LoginUserUseCase::new(service)
      .execute(
        LoginUserCommand {
          email: "user@example.com".to_string(),
          password: String::new(),
        },
        None,
        None,
      )
      .await;

    assert!(matches!(result, Err(AuthError::Validation(_))));
  }
}
