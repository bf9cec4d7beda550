use async_trait::async_trait;
use oauth2::reqwest::async_http_client;
use oauth2::{
  AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
  TokenResponse, TokenUrl, basic::BasicClient,
};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::domain::auth::entities::ExternalUser;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::OAuthProvider;
use crate::domain::auth::value_objects::ProviderKind;
use crate::infrastructure::config::GoogleOAuthConfig;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Response of the Google userinfo endpoint
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
  id: String,
  email: String,
  #[serde(default)]
  verified_email: bool,
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  picture: Option<String>,
}

impl From<GoogleUserInfo> for ExternalUser {
  fn from(info: GoogleUserInfo) -> Self {
    Self {
      external_id: info.id,
      email: info.email,
      name: info.name.unwrap_or_default(),
      avatar_url: info.picture,
      verified: info.verified_email,
    }
  }
}

/// Google OpenID Connect provider
///
/// Requests the `openid email profile` scopes, exchanges the authorization
/// code for an access token and reads the user from the userinfo endpoint.
pub struct GoogleOAuthProvider {
  client: BasicClient,
  http: reqwest::Client,
}

impl GoogleOAuthProvider {
  pub fn new(config: &GoogleOAuthConfig) -> Result<Self, AuthError> {
    let client = BasicClient::new(
      ClientId::new(config.client_id.clone()),
      Some(ClientSecret::new(
        config.client_secret.expose_secret().clone(),
      )),
      AuthUrl::new(AUTH_URL.to_string())
        .map_err(|e| AuthError::OAuth(format!("Invalid auth URL: {}", e)))?,
      Some(
        TokenUrl::new(TOKEN_URL.to_string())
          .map_err(|e| AuthError::OAuth(format!("Invalid token URL: {}", e)))?,
      ),
    )
    .set_redirect_uri(
      RedirectUrl::new(config.redirect_url.clone())
        .map_err(|e| AuthError::OAuth(format!("Invalid redirect URL: {}", e)))?,
    );

    Ok(Self {
      client,
      http: reqwest::Client::new(),
    })
  }

  async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AuthError> {
    let response = self
      .http
      .get(USERINFO_URL)
      .bearer_auth(access_token)
      .send()
      .await
      .map_err(|e| AuthError::OAuth(format!("Userinfo request failed: {}", e)))?;

    if !response.status().is_success() {
      return Err(AuthError::OAuth(format!(
        "Userinfo request returned {}",
        response.status()
      )));
    }

    response
      .json::<GoogleUserInfo>()
      .await
      .map_err(|e| AuthError::OAuth(format!("Invalid userinfo response: {}", e)))
  }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
  fn kind(&self) -> ProviderKind {
    ProviderKind::Google
  }

  fn authorization_url(&self, state: &str) -> String {
    let state = state.to_string();
    let (auth_url, _) = self
      .client
      .authorize_url(|| CsrfToken::new(state))
      .add_scope(Scope::new("openid".to_string()))
      .add_scope(Scope::new("email".to_string()))
      .add_scope(Scope::new("profile".to_string()))
      .url();

    auth_url.to_string()
  }

  async fn exchange_code(&self, code: &str) -> Result<ExternalUser, AuthError> {
    let token_response = self
      .client
      .exchange_code(AuthorizationCode::new(code.to_string()))
      .request_async(async_http_client)
      .await
      .map_err(|e| AuthError::OAuth(format!("Token exchange failed: {}", e)))?;

    let info = self
      .fetch_user_info(token_response.access_token().secret())
      .await?;

    Ok(info.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use secrecy::Secret;

  fn provider() -> GoogleOAuthProvider {
    GoogleOAuthProvider::new(&GoogleOAuthConfig {
      client_id: "client-id".to_string(),
      client_secret: Secret::new("client-secret".to_string()),
      redirect_url: "http://localhost:8080/api/v1/auth/google/callback".to_string(),
      exchange_timeout_seconds: 10,
    })
    .unwrap()
  }

  #[test]
  fn test_authorization_url_carries_scopes_and_state() {
    let url = provider().authorization_url("state-123");

    assert!(url.starts_with(AUTH_URL));
    assert!(url.contains("client_id=client-id"));
    assert!(url.contains("state=state-123"));
    assert!(url.contains("scope=openid+email+profile"));
    assert!(url.contains("response_type=code"));
  }

  #[test]
  fn test_rejects_invalid_redirect_url() {
    let result = GoogleOAuthProvider::new(&GoogleOAuthConfig {
      client_id: "client-id".to_string(),
      client_secret: Secret::new("client-secret".to_string()),
      redirect_url: "not a url".to_string(),
      exchange_timeout_seconds: 10,
    });

    assert!(matches!(result, Err(AuthError::OAuth(_))));
  }

  #[test]
  fn test_userinfo_mapping() {
    let info: GoogleUserInfo = serde_json::from_str(
      r#"{"id":"123","email":"john@example.com","verified_email":true,"name":"John Doe","picture":"https://example.com/p.jpg"}"#,
    )
    .unwrap();

    let user = ExternalUser::from(info);
    assert_eq!(user.external_id, "123");
    assert_eq!(user.name, "John Doe");
    assert!(user.verified);
  }

  #[test]
  fn test_userinfo_without_name() {
    let info: GoogleUserInfo =
      serde_json::from_str(r#"{"id":"123","email":"john@example.com"}"#).unwrap();

    let user = ExternalUser::from(info);
    assert_eq!(user.name, "");
    assert!(!user.verified);
    assert!(user.avatar_url.is_none());
  }
}
