use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use std::sync::Arc;

use crate::domain::auth::ports::OAuthProvider;

#[derive(Debug, Clone, Default)]
pub struct RedirectGoogleCommand {
  /// Caller-chosen state; a random one is generated when absent
  pub state: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RedirectGoogleResponse {
  /// Consent screen URL the client should be sent to
  pub url: String,
  /// State carried by the URL, to be checked on callback
  pub state: String,
}

/// Use case for starting the Google authorization code flow
pub struct RedirectGoogleUseCase {
  provider: Arc<dyn OAuthProvider>,
}

impl RedirectGoogleUseCase {
  pub fn new(provider: Arc<dyn OAuthProvider>) -> Self {
    Self { provider }
  }

  pub fn execute(&self, command: RedirectGoogleCommand) -> RedirectGoogleResponse {
    let state = command
      .state
      .filter(|state| !state.trim().is_empty())
      .unwrap_or_else(random_state);

    RedirectGoogleResponse {
      url: self.provider.authorization_url(&state),
      state,
    }
  }
}

fn random_state() -> String {
  let mut bytes = [0u8; 16];
  rand::rngs::OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::oauth::MockOAuthProvider;

  fn use_case() -> RedirectGoogleUseCase {
    RedirectGoogleUseCase::new(Arc::new(MockOAuthProvider::new("http://localhost/cb").unwrap()))
  }

  #[test]
  fn test_keeps_supplied_state() {
    let response = use_case().execute(RedirectGoogleCommand {
      state: Some("xyz".to_string()),
    });

    assert_eq!(response.state, "xyz");
    assert!(response.url.ends_with("state=xyz"));
  }

  #[test]
  fn test_generates_random_state() {
    let first = use_case().execute(RedirectGoogleCommand::default());
    let second = use_case().execute(RedirectGoogleCommand::default());

    assert_eq!(first.state.len(), 22);
    assert_ne!(first.state, second.state);
    assert!(first.url.contains(&first.state));
  }
}
