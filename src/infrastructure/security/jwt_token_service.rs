use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{AccessClaims, TokenParams, TokenService};
use crate::infrastructure::config::JwtConfig;

/// HS256 access token service
///
/// The signing key is the raw UTF-8 bytes of the configured secret on every
/// login path.
pub struct JwtTokenService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl: Duration,
}

impl JwtTokenService {
  pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret),
      decoding_key: DecodingKey::from_secret(secret),
      ttl: Duration::seconds(ttl_seconds),
    }
  }

  pub fn from_config(config: &JwtConfig) -> Self {
    Self::new(
      config.secret.expose_secret().as_bytes(),
      config.access_token_ttl_seconds,
    )
  }
}

impl TokenService for JwtTokenService {
  fn generate(&self, params: &TokenParams) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now
      .checked_add_signed(self.ttl)
      .ok_or_else(|| AuthError::TokenGeneration("Duration out of range".to_string()))?;

    let claims = AccessClaims {
      user_id: params.user_id,
      iat: now.timestamp(),
      exp: exp.timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| AuthError::TokenGeneration(e.to_string()))
  }

  fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    // Tokens carry user_id instead of sub
    validation.required_spec_claims.clear();
    validation.required_spec_claims.insert("exp".to_string());

    decode::<AccessClaims>(token, &self.decoding_key, &validation)
      .map(|data| data.claims)
      .map_err(|e| {
        tracing::debug!("Rejected access token: {}", e);
        AuthError::InvalidToken
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  #[test]
  fn test_generate_and_verify() {
    let service = JwtTokenService::new(b"secret", 86400);
    let user_id = Uuid::new_v4();

    let token = service.generate(&TokenParams { user_id }).unwrap();
    let claims = service.verify(&token).unwrap();

    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.exp - claims.iat, 86400);
  }

  #[test]
  fn test_token_signed_with_other_key_is_rejected() {
    let issuer = JwtTokenService::new(b"secret-a", 86400);
    let verifier = JwtTokenService::new(b"secret-b", 86400);

    let token = issuer
      .generate(&TokenParams {
        user_id: Uuid::new_v4(),
      })
      .unwrap();

    assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidToken)));
  }

  #[test]
  fn test_expired_token_is_rejected() {
    let service = JwtTokenService::new(b"secret", -60);
    let token = service
      .generate(&TokenParams {
        user_id: Uuid::new_v4(),
      })
      .unwrap();

    assert!(matches!(service.verify(&token), Err(AuthError::InvalidToken)));
  }

  #[test]
  fn test_garbage_token_is_rejected() {
    let service = JwtTokenService::new(b"secret", 86400);
    assert!(matches!(
      service.verify("not.a.jwt"),
      Err(AuthError::InvalidToken)
    ));
  }
}
