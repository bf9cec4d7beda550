use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::{ExternalUser, User, UserProfile, UserProvider, UserSession};
use super::errors::AuthError;
use super::value_objects::{Email, Password, PasswordHash, ProviderKind, RefreshToken, TokenHash};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Creates a user together with its first provider binding
  ///
  /// Implementations must be atomic: either both rows exist afterwards or
  /// neither does.
  async fn create_with_provider(
    &self,
    user: User,
    provider: UserProvider,
  ) -> Result<(User, UserProvider), AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Finds the user owning the binding `(provider, provider_key)`
  async fn find_by_provider(
    &self,
    provider: &ProviderKind,
    provider_key: &str,
  ) -> Result<Option<User>, AuthError>;
}

/// Repository trait for login-method bindings
#[async_trait]
pub trait UserProviderRepository: Send + Sync {
  async fn find_by_provider_key(
    &self,
    provider: &ProviderKind,
    provider_key: &str,
  ) -> Result<Option<UserProvider>, AuthError>;

  async fn create(&self, provider: UserProvider) -> Result<UserProvider, AuthError>;
}

/// Repository trait for user profiles
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
  async fn create(&self, profile: UserProfile) -> Result<UserProfile, AuthError>;

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, AuthError>;
}

/// Repository trait for session persistence operations
///
/// Sessions are never deleted, only revoked.
#[async_trait]
pub trait SessionRepository: Send + Sync {
  /// Creates a new session in the repository
  async fn create(&self, session: UserSession) -> Result<UserSession, AuthError>;

  /// Finds a session by the hash of its refresh token
  async fn find_by_refresh_token_hash(
    &self,
    token_hash: &TokenHash,
  ) -> Result<Option<UserSession>, AuthError>;

  /// Sets the revocation timestamp of a session
  async fn revoke(&self, session_id: Uuid, revoked_at: DateTime<Utc>) -> Result<(), AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordEncrypter: Send + Sync {
  /// Hashes a plain text password with a salted, deliberately slow function
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a stored hash in constant time
  async fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, AuthError>;
}

/// Input of access token issuance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParams {
  pub user_id: Uuid,
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
  pub user_id: Uuid,
  /// Issued at (seconds since epoch)
  pub iat: i64,
  /// Expiration (seconds since epoch)
  pub exp: i64,
}

/// Service trait for signing and checking bearer access tokens
pub trait TokenService: Send + Sync {
  /// Produces a signed access token for the user
  fn generate(&self, params: &TokenParams) -> Result<String, AuthError>;

  /// Checks signature and expiry, returning the claims
  fn verify(&self, token: &str) -> Result<AccessClaims, AuthError>;
}

/// Third-party identity provider speaking the authorization code flow
#[async_trait]
pub trait OAuthProvider: Send + Sync {
  /// Kind recorded on bindings created for this provider
  fn kind(&self) -> ProviderKind;

  /// Builds the consent screen URL carrying the given state token
  fn authorization_url(&self, state: &str) -> String;

  /// Exchanges an authorization code for the external user record
  async fn exchange_code(&self, code: &str) -> Result<ExternalUser, AuthError>;
}

/// Service trait for secure refresh token generation
#[async_trait]
pub trait RefreshTokenGenerator: Send + Sync {
  /// Generates a cryptographically secure random token
  async fn generate(&self) -> Result<RefreshToken, AuthError>;
}
