use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::RefreshTokenGenerator;
use crate::domain::auth::value_objects::RefreshToken;

/// Refresh token generator backed by the OS random number generator
pub struct SecureRefreshTokenGenerator;

impl SecureRefreshTokenGenerator {
  const TOKEN_BYTES: usize = 32;

  pub fn new() -> Self {
    Self
  }
}

impl Default for SecureRefreshTokenGenerator {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl RefreshTokenGenerator for SecureRefreshTokenGenerator {
  /// Generates 32 random bytes encoded as base64url without padding
  async fn generate(&self) -> Result<RefreshToken, AuthError> {
    let mut token_bytes = [0u8; Self::TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut token_bytes);

    RefreshToken::new(URL_SAFE_NO_PAD.encode(token_bytes))
      .map_err(|e| AuthError::TokenGeneration(e.to_string()))
  }
}
