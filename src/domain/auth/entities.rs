use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

use super::value_objects::{Email, PasswordHash, ProviderKind, TokenHash};

/// User entity representing a user in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  /// User's email address (unique, lowercase)
  pub email: String,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp when the user was last updated
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Creates a new user for the given email
  pub fn new(email: &Email) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      email: email.as_str().to_string(),
      created_at: now,
      updated_at: now,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      created_at,
      updated_at,
    }
  }
}

/// Optional display data owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: Uuid,
  pub user_id: Uuid,
  pub name: String,
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl UserProfile {
  pub fn new(user_id: Uuid, name: String, avatar_url: Option<String>) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      name,
      avatar_url,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    name: String,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      user_id,
      name,
      avatar_url,
      created_at,
      updated_at,
    }
  }
}

/// Binding between a user and one login method
///
/// `(provider, provider_key)` is unique. For the password kind the key is the
/// user's email and `password_hash` is set; external kinds carry the
/// provider-assigned user ID and no hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProvider {
  pub id: Uuid,
  pub user_id: Uuid,
  pub provider: ProviderKind,
  pub provider_key: String,
  pub password_hash: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl UserProvider {
  /// Creates the password binding for a user
  pub fn password(user_id: Uuid, email: &Email, password_hash: PasswordHash) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      provider: ProviderKind::Password,
      provider_key: email.as_str().to_string(),
      password_hash: Some(password_hash.into_inner()),
      created_at: Utc::now(),
    }
  }

  /// Creates a binding to an external identity
  pub fn external(user_id: Uuid, provider: ProviderKind, external_id: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      provider,
      provider_key: external_id,
      password_hash: None,
      created_at: Utc::now(),
    }
  }

  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    provider: ProviderKind,
    provider_key: String,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      user_id,
      provider,
      provider_key,
      password_hash,
      created_at,
    }
  }

  /// Returns the stored password hash, if this binding can verify passwords
  pub fn password_hash(&self) -> Option<&str> {
    if !self.provider.uses_password() {
      return None;
    }
    self.password_hash.as_deref().filter(|hash| !hash.is_empty())
  }
}

/// Refresh-token-bearing login session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
  /// Unique identifier for the session
  pub id: Uuid,
  /// Reference to the user who owns this session
  pub user_id: Uuid,
  /// SHA-256 of the refresh token handed to the client
  pub refresh_token_hash: String,
  /// User agent string from the client
  pub user_agent: Option<String>,
  /// IP address from which the session was created
  pub ip_address: Option<IpAddr>,
  /// Timestamp when the session expires, `None` means it never does
  pub expires_at: Option<DateTime<Utc>>,
  /// Timestamp when the session was revoked
  pub revoked_at: Option<DateTime<Utc>>,
  /// Timestamp when the session was created
  pub created_at: DateTime<Utc>,
}

impl UserSession {
  /// Creates a new session for a user
  pub fn new(
    user_id: Uuid,
    refresh_token_hash: TokenHash,
    user_agent: Option<String>,
    ip_address: Option<IpAddr>,
    expires_at: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      refresh_token_hash: refresh_token_hash.into_inner(),
      user_agent,
      ip_address,
      expires_at,
      revoked_at: None,
      created_at: Utc::now(),
    }
  }

  /// Creates a session from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    refresh_token_hash: String,
    user_agent: Option<String>,
    ip_address: Option<IpAddr>,
    expires_at: Option<DateTime<Utc>>,
    revoked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      user_id,
      refresh_token_hash,
      user_agent,
      ip_address,
      expires_at,
      revoked_at,
      created_at,
    }
  }

  /// Checks if the session had expired at the given instant
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at.is_some_and(|expires_at| expires_at <= now)
  }

  /// Checks if the session has expired
  pub fn is_expired(&self) -> bool {
    self.is_expired_at(Utc::now())
  }

  /// Checks if the session has been revoked
  pub fn is_revoked(&self) -> bool {
    self.revoked_at.is_some()
  }

  /// A session is valid iff it is neither expired nor revoked
  pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
    !self.is_expired_at(now) && !self.is_revoked()
  }

  /// Checks if the session is still valid now
  pub fn is_valid(&self) -> bool {
    self.is_valid_at(Utc::now())
  }

  /// Marks the session as revoked; the first revocation timestamp wins
  pub fn revoke(&mut self, at: DateTime<Utc>) {
    if self.revoked_at.is_none() {
      self.revoked_at = Some(at);
    }
  }
}

/// Client metadata recorded on a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
  pub user_agent: Option<String>,
  pub ip_address: Option<IpAddr>,
}

/// Identity data returned by a third-party provider after a code exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalUser {
  /// Provider-assigned user ID
  pub external_id: String,
  pub email: String,
  /// Display name, may be empty
  pub name: String,
  pub avatar_url: Option<String>,
  /// Whether the provider reports the email as verified
  pub verified: bool,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::RefreshToken;
  use chrono::Duration;

  fn token_hash() -> TokenHash {
    RefreshToken::new("refresh").unwrap().hash()
  }

  #[test]
  fn test_user_creation() {
    let email = Email::new("Test@Example.com").unwrap();
    let user = User::new(&email);

    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.created_at, user.updated_at);
  }

  #[test]
  fn test_password_binding_exposes_hash() {
    let email = Email::new("test@example.com").unwrap();
    let hash = PasswordHash::from_hash("$argon2id$v=19$m=19456,t=2,p=1$abc$def").unwrap();
    let binding = UserProvider::password(Uuid::new_v4(), &email, hash);

    assert_eq!(binding.provider, ProviderKind::Password);
    assert_eq!(binding.provider_key, "test@example.com");
    assert!(binding.password_hash().is_some());
  }

  #[test]
  fn test_external_binding_has_no_hash() {
    let binding = UserProvider::external(Uuid::new_v4(), ProviderKind::Google, "g-123".into());
    assert!(binding.password_hash().is_none());
  }

  #[test]
  fn test_session_with_past_expiry_is_expired() {
    let session = UserSession::new(
      Uuid::new_v4(),
      token_hash(),
      None,
      None,
      Some(Utc::now() - Duration::seconds(10)),
    );

    assert!(session.is_expired());
    assert!(!session.is_valid());
  }

  #[test]
  fn test_session_with_future_expiry_is_valid() {
    let session = UserSession::new(
      Uuid::new_v4(),
      token_hash(),
      Some("Mozilla/5.0".to_string()),
      Some("127.0.0.1".parse().unwrap()),
      Some(Utc::now() + Duration::days(30)),
    );

    assert!(!session.is_expired());
    assert!(!session.is_revoked());
    assert!(session.is_valid());
  }

  #[test]
  fn test_session_without_expiry_never_expires() {
    let session = UserSession::new(Uuid::new_v4(), token_hash(), None, None, None);
    assert!(session.is_valid_at(Utc::now() + Duration::days(3650)));
  }

  #[test]
  fn test_revoked_session_is_invalid() {
    let mut session = UserSession::new(
      Uuid::new_v4(),
      token_hash(),
      None,
      None,
      Some(Utc::now() + Duration::hours(1)),
    );

    let first = Utc::now();
    session.revoke(first);
    session.revoke(first + Duration::minutes(5));

    assert!(session.is_revoked());
    assert!(!session.is_valid());
    assert_eq!(session.revoked_at, Some(first));
  }
}
