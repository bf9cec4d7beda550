use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::ExternalLoginResponse;
use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::ports::OAuthProvider;
use crate::domain::auth::services::AuthService;

/// Command for completing the Google authorization code flow
#[derive(Debug, Clone)]
pub struct LoginGoogleCommand {
  /// Authorization code from the OAuth callback
  pub code: String,
}

/// Use case for logging in through Google
pub struct LoginGoogleUseCase {
  auth_service: Arc<AuthService>,
  provider: Arc<dyn OAuthProvider>,
  exchange_timeout: Duration,
}

impl LoginGoogleUseCase {
  pub fn new(
    auth_service: Arc<AuthService>,
    provider: Arc<dyn OAuthProvider>,
    exchange_timeout: Duration,
  ) -> Self {
    Self {
      auth_service,
      provider,
      exchange_timeout,
    }
  }

  /// Exchanges the code and logs the resolved user in
  ///
  /// The exchange is abandoned as soon as `cancel` fires or the configured
  /// timeout elapses; no user state is touched in either case.
  ///
  /// # Errors
  /// - `AuthError::OAuthCancelled` when the token is cancelled first
  /// - `AuthError::OAuthTimeout` when the provider does not answer in time
  /// - `AuthError::OAuth` when the provider rejects the code
  pub async fn execute(
    &self,
    command: LoginGoogleCommand,
    cancel: CancellationToken,
  ) -> Result<ExternalLoginResponse, AuthError> {
    let code = command.code.trim();
    if code.is_empty() {
      return Err(AuthError::Validation(ValidationError::MissingField {
        field: "code".to_string(),
      }));
    }

    let external = tokio::select! {
      biased;
      _ = cancel.cancelled() => return Err(AuthError::OAuthCancelled),
      result = tokio::time::timeout(self.exchange_timeout, self.provider.exchange_code(code)) => {
        match result {
          Ok(external) => external?,
          Err(_) => {
            tracing::warn!(timeout = ?self.exchange_timeout, "OAuth code exchange timed out");
            return Err(AuthError::OAuthTimeout);
          }
        }
      }
    };

    let login = self
      .auth_service
      .login_external(self.provider.kind(), external)
      .await?;

    Ok(login.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::services::tests::test_service;
  use crate::infrastructure::oauth::MockOAuthProvider;

  fn use_case(delay: Duration, timeout: Duration) -> (LoginGoogleUseCase, crate::infrastructure::persistence::InMemoryRepository) {
    let (service, repo) = test_service();
    let provider = MockOAuthProvider::new("http://localhost/callback")
      .unwrap()
      .with_delay(delay);
    (LoginGoogleUseCase::new(service, Arc::new(provider), timeout), repo)
  }

  fn command(code: &str) -> LoginGoogleCommand {
    LoginGoogleCommand {
      code: code.to_string(),
    }
  }

  #[tokio::test]
  async fn test_google_login_is_idempotent() {
    let (use_case, repo) = use_case(Duration::ZERO, Duration::from_secs(5));

    let first = use_case
      .execute(command("mock-auth-code-g123"), CancellationToken::new())
      .await
      .unwrap();
    let second = use_case
      .execute(command("mock-auth-code-g123"), CancellationToken::new())
      .await
      .unwrap();

    assert!(first.is_new_user);
    assert!(!second.is_new_user);
    assert_eq!(first.user_id, second.user_id);
    assert_eq!(repo.user_count().await, 1);
    assert_eq!(repo.provider_count().await, 1);
    assert_eq!(repo.profile_count().await, 1);
  }

  #[tokio::test]
  async fn test_cancelled_exchange() {
    let (use_case, repo) = use_case(Duration::from_secs(5), Duration::from_secs(10));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = use_case.execute(command("mock-auth-code-a"), cancel).await;

    assert!(matches!(result, Err(AuthError::OAuthCancelled)));
    assert_eq!(repo.user_count().await, 0);
  }

  #[tokio::test]
  async fn test_exchange_timeout() {
    let (use_case, repo) = use_case(Duration::from_secs(5), Duration::from_millis(20));

    let result = use_case
      .execute(command("mock-auth-code-b"), CancellationToken::new())
      .await;

    assert!(matches!(result, Err(AuthError::OAuthTimeout)));
    assert_eq!(repo.user_count().await, 0);
  }

  #[tokio::test]
  async fn test_missing_code() {
    let (use_case, _) = use_case(Duration::ZERO, Duration::from_secs(5));

    let result = use_case.execute(command("  "), CancellationToken::new()).await;

    assert!(matches!(result, Err(AuthError::Validation(_))));
  }
}
