/// Mock OAuth provider for development and testing
///
/// Simulates the Google flow without contacting Google. The authorization URL
/// points straight back at the callback with a generated code, and every code
/// exchanges into a deterministic user, so the same code always resolves to
/// the same account.
///
/// To enable mock OAuth, set MOCK_OAUTH=true in your environment
use async_trait::async_trait;
use oauth2::url::Url;
use std::time::Duration;

use crate::domain::auth::entities::ExternalUser;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::OAuthProvider;
use crate::domain::auth::value_objects::ProviderKind;

pub struct MockOAuthProvider {
  redirect_url: Url,
  delay: Duration,
}

impl MockOAuthProvider {
  pub fn new(redirect_url: &str) -> Result<Self, AuthError> {
    let redirect_url = Url::parse(redirect_url)
      .map_err(|e| AuthError::OAuth(format!("Invalid redirect URL: {}", e)))?;

    Ok(Self {
      redirect_url,
      delay: Duration::from_millis(100),
    })
  }

  /// Overrides the simulated network latency of the code exchange
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }
}

#[async_trait]
impl OAuthProvider for MockOAuthProvider {
  fn kind(&self) -> ProviderKind {
    ProviderKind::Google
  }

  fn authorization_url(&self, state: &str) -> String {
    let mut url = self.redirect_url.clone();
    url
      .query_pairs_mut()
      .append_pair(
        "code",
        &format!("mock-auth-code-{}", uuid::Uuid::new_v4().simple()),
      )
      .append_pair("state", state);
    url.to_string()
  }

  async fn exchange_code(&self, code: &str) -> Result<ExternalUser, AuthError> {
    tokio::time::sleep(self.delay).await;

    let id: String = code
      .trim_start_matches("mock-auth-code-")
      .chars()
      .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
      .collect::<String>()
      .to_lowercase();

    if id.is_empty() {
      return Err(AuthError::OAuth("Invalid authorization code".to_string()));
    }

    Ok(ExternalUser {
      external_id: format!("mock-{}", id),
      email: format!("{}@mock.local", id),
      name: format!("Mock User {}", id),
      avatar_url: None,
      verified: true,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_authorization_url_points_at_callback() {
    let provider =
      MockOAuthProvider::new("http://localhost:8080/api/v1/auth/google/callback").unwrap();
    let url = provider.authorization_url("abc");

    assert!(url.starts_with("http://localhost:8080/api/v1/auth/google/callback?code=mock-auth-code-"));
    assert!(url.ends_with("&state=abc"));
  }

  #[test]
  fn test_authorization_url_encodes_state() {
    let provider = MockOAuthProvider::new("http://localhost/cb").unwrap();
    let url = Url::parse(&provider.authorization_url("a&b=c#frag")).unwrap();

    assert!(url.fragment().is_none());
    let state = url
      .query_pairs()
      .find(|(key, _)| key == "state")
      .map(|(_, value)| value.into_owned());
    assert_eq!(state.as_deref(), Some("a&b=c#frag"));
    assert_eq!(url.query_pairs().count(), 2);
  }

  #[test]
  fn test_rejects_invalid_redirect_url() {
    assert!(MockOAuthProvider::new("not a url").is_err());
  }

  #[tokio::test]
  async fn test_exchange_is_deterministic() {
    let provider = MockOAuthProvider::new("http://localhost/cb")
      .unwrap()
      .with_delay(Duration::ZERO);

    let first = provider.exchange_code("mock-auth-code-alice").await.unwrap();
    let second = provider.exchange_code("mock-auth-code-alice").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.external_id, "mock-alice");
    assert_eq!(first.email, "alice@mock.local");
  }

  #[tokio::test]
  async fn test_exchange_rejects_empty_code() {
    let provider = MockOAuthProvider::new("http://localhost/cb")
      .unwrap()
      .with_delay(Duration::ZERO);
    let result = provider.exchange_code("!!!").await;

    assert!(matches!(result, Err(AuthError::OAuth(_))));
  }
}
