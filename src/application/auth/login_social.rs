use std::sync::Arc;

use super::ExternalLoginResponse;
use crate::domain::auth::entities::ExternalUser;
use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::ProviderKind;

/// Command for logging in with an identity asserted by a social provider
#[derive(Debug, Clone)]
pub struct LoginSocialCommand {
  /// Provider name, e.g. "github"
  pub provider: String,
  /// Provider-assigned user ID
  pub provider_id: String,
  pub email: String,
  pub name: Option<String>,
  pub avatar_url: Option<String>,
}

/// Use case for logging in through a generic social provider
///
/// Nothing here checks the assertion itself, so this is not exposed over
/// HTTP. Callers are adapters that have already verified the identity with
/// the provider. Google identities only come through [`super::LoginGoogleUseCase`],
/// and an assertion never takes over an existing account with the same email.
pub struct LoginSocialUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginSocialUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  pub async fn execute(
    &self,
    command: LoginSocialCommand,
  ) -> Result<ExternalLoginResponse, AuthError> {
    let kind: ProviderKind = command.provider.parse()?;
    if !matches!(kind, ProviderKind::Social(_)) {
      return Err(AuthError::Validation(ValidationError::InvalidField {
        field: "provider".to_string(),
      }));
    }

    let external = ExternalUser {
      external_id: command.provider_id.trim().to_string(),
      email: command.email,
      name: command.name.unwrap_or_default(),
      avatar_url: command.avatar_url.filter(|url| !url.trim().is_empty()),
      // Nothing is verified on this path
      verified: false,
    };

    let login = self.auth_service.login_external(kind, external).await?;

    Ok(login.into())
  }
}
