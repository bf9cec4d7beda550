use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  /// Unique identifier of the newly created user
  pub user_id: Uuid,
  /// Normalized email address
  pub email: String,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// The email is validated before the password, so a request with both
  /// invalid reports the email.
  ///
  /// # Errors
  /// Returns `AuthError` if registration fails (e.g., email already exists,
  /// invalid email format, weak password)
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let user = self.auth_service.register(email, password).await?;

    Ok(RegisterUserResponse {
      user_id: user.id,
      email: user.email,
      created_at: user.created_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::ValidationError;
  use crate::domain::auth::services::tests::test_service;

  fn command(email: &str, password: &str) -> RegisterUserCommand {
    RegisterUserCommand {
      email: email.to_string(),
      password: password.to_string(),
    }
  }

  #[tokio::test]
  async fn test_register_normalizes_email() {
    let (service, _) = test_service();
    let use_case = RegisterUserUseCase::new(service);

    let response = use_case
      .execute(command("  New.User@Example.COM", "Valid1Pass!"))
      .await
      .unwrap();

    assert_eq!(response.email, "new.user@example.com");
  }

  #[tokio::test]
  async fn test_register_reports_email_before_password() {
    let (service, repo) = test_service();
    let use_case = RegisterUserUseCase::new(service);

    let result = use_case.execute(command("a..b@example.com", "weak")).await;
    assert!(matches!(result, Err(AuthError::InvalidEmailFormat)));

    let result = use_case.execute(command("ok@example.com", "NoSymbol123")).await;
    assert!(matches!(
      result,
      Err(AuthError::Validation(ValidationError::PasswordMissingSpecial))
    ));

    assert_eq!(repo.user_count().await, 0);
  }

  #[tokio::test]
  async fn test_register_duplicate_email() {
    let (service, _) = test_service();
    let use_case = RegisterUserUseCase::new(service);

    use_case
      .execute(command("taken@example.com", "Valid1Pass!"))
      .await
      .unwrap();
    let result = use_case
      .execute(command("taken@example.com", "Valid1Pass!"))
      .await;

    assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
  }
}
