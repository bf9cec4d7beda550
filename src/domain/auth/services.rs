use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::entities::{DeviceInfo, ExternalUser, User, UserProfile, UserProvider, UserSession};
use super::errors::{AuthError, HashError, ValidationError};
use super::ports::{
  PasswordEncrypter, RefreshTokenGenerator, SessionRepository, TokenParams, TokenService,
  UserProfileRepository, UserProviderRepository, UserRepository,
};
use super::value_objects::{Email, Password, PasswordHash, ProviderKind, RefreshToken};

/// Hashed once and verified against when a login has no password to check
const DUMMY_PASSWORD: &str = "timing-equalizer-Pa55!";

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  /// Lifetime of sessions created by password login
  pub refresh_token_ttl_seconds: i64,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      refresh_token_ttl_seconds: 30 * 24 * 60 * 60,
    }
  }
}

/// Collaborators of the authentication service
pub struct AuthServiceDependencies {
  pub user_repo: Arc<dyn UserRepository>,
  pub provider_repo: Arc<dyn UserProviderRepository>,
  pub profile_repo: Arc<dyn UserProfileRepository>,
  pub session_repo: Arc<dyn SessionRepository>,
  pub password_encrypter: Arc<dyn PasswordEncrypter>,
  pub token_service: Arc<dyn TokenService>,
  pub refresh_tokens: Arc<dyn RefreshTokenGenerator>,
}

/// Input of session creation
#[derive(Debug, Clone)]
pub struct NewSession {
  pub user_id: Uuid,
  pub refresh_token: RefreshToken,
  pub device: DeviceInfo,
  pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a successful password login
#[derive(Debug, Clone)]
pub struct PasswordLogin {
  pub user_id: Uuid,
  pub access_token: String,
  pub refresh_token: RefreshToken,
  pub session: UserSession,
}

/// Result of a successful external identity login
#[derive(Debug, Clone)]
pub struct ExternalLogin {
  pub user_id: Uuid,
  pub access_token: String,
  /// Whether this login created the user
  pub is_new_user: bool,
}

/// Authentication service implementing core business logic
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  provider_repo: Arc<dyn UserProviderRepository>,
  profile_repo: Arc<dyn UserProfileRepository>,
  session_repo: Arc<dyn SessionRepository>,
  password_encrypter: Arc<dyn PasswordEncrypter>,
  token_service: Arc<dyn TokenService>,
  refresh_tokens: Arc<dyn RefreshTokenGenerator>,
  config: AuthServiceConfig,
  dummy_hash: OnceCell<PasswordHash>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(deps: AuthServiceDependencies, config: AuthServiceConfig) -> Self {
    Self {
      user_repo: deps.user_repo,
      provider_repo: deps.provider_repo,
      profile_repo: deps.profile_repo,
      session_repo: deps.session_repo,
      password_encrypter: deps.password_encrypter,
      token_service: deps.token_service,
      refresh_tokens: deps.refresh_tokens,
      config,
      dummy_hash: OnceCell::new(),
    }
  }

  /// Registers a new user with email and password
  ///
  /// No token is issued; the caller logs in separately.
  ///
  /// # Errors
  /// Returns `AuthError::EmailAlreadyExists` if email is already registered,
  /// including when a concurrent registration wins the race.
  pub async fn register(&self, email: Email, password: Password) -> Result<User, AuthError> {
    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = self.password_encrypter.hash(&password).await?;

    let user = User::new(&email);
    let provider = UserProvider::password(user.id, &email, password_hash);

    match self.user_repo.create_with_provider(user, provider).await {
      Ok((user, _)) => {
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
      }
      Err(e) if e.is_duplicate_key() => Err(AuthError::EmailAlreadyExists),
      Err(AuthError::Repository(e)) => {
        tracing::error!("Failed to persist new user: {}", e);
        Err(AuthError::UserCreationFailed(e.to_string()))
      }
      Err(e) => Err(e),
    }
  }

  /// Authenticates a user by password and opens a session
  ///
  /// # Errors
  /// - `AuthError::SocialLoginOnly` when no password binding exists for the
  ///   email, or the binding has no hash
  /// - `AuthError::InvalidCredentials` when the password does not match
  pub async fn login(
    &self,
    email: Email,
    password: Password,
    device: DeviceInfo,
  ) -> Result<PasswordLogin, AuthError> {
    let binding = self
      .provider_repo
      .find_by_provider_key(&ProviderKind::Password, email.as_str())
      .await?
      .and_then(|binding| {
        let stored_hash = binding.password_hash()?.to_string();
        Some((binding, stored_hash))
      });

    // Unknown and social-only accounts pay for one verification too
    let Some((binding, stored_hash)) = binding else {
      self.verify_dummy(&password).await;
      return Err(AuthError::SocialLoginOnly);
    };

    let password_hash =
      PasswordHash::from_hash(stored_hash).map_err(|_| AuthError::Hash(HashError::InvalidFormat))?;

    if !self
      .password_encrypter
      .verify(&password, &password_hash)
      .await?
    {
      tracing::warn!(user_id = %binding.user_id, "Password login rejected");
      return Err(AuthError::InvalidCredentials);
    }

    let access_token = self.issue_access_token(binding.user_id)?;
    let refresh_token = self.refresh_tokens.generate().await?;
    let expires_at = Utc::now() + Duration::seconds(self.config.refresh_token_ttl_seconds);

    let session = self
      .create_session(NewSession {
        user_id: binding.user_id,
        refresh_token: refresh_token.clone(),
        device,
        expires_at: Some(expires_at),
      })
      .await?;

    tracing::info!(user_id = %binding.user_id, session_id = %session.id, "Password login succeeded");

    Ok(PasswordLogin {
      user_id: binding.user_id,
      access_token,
      refresh_token,
      session,
    })
  }

  async fn verify_dummy(&self, password: &Password) {
    let dummy_hash = self
      .dummy_hash
      .get_or_try_init(|| async {
        match Password::for_verification(DUMMY_PASSWORD) {
          Ok(filler) => self.password_encrypter.hash(&filler).await,
          Err(e) => Err(AuthError::from(e)),
        }
      })
      .await;

    match dummy_hash {
      Ok(hash) => {
        let _ = self.password_encrypter.verify(password, hash).await;
      }
      Err(e) => tracing::error!("Failed to prepare dummy password hash: {}", e),
    }
  }

  /// Logs in through an external identity
  ///
  /// Resolution order:
  /// 1. an existing binding for `(kind, external_id)` wins outright
  /// 2. otherwise the user is looked up by email, or created with the binding
  /// 3. an existing user gets a new binding to the external identity
  /// 4. a profile is created when the user has none and a name is supplied
  /// 5. an access token is issued for the resolved user
  ///
  /// A local account with the same email is linked only when the provider
  /// reports the email as verified; otherwise the login fails with
  /// `AuthError::EmailAlreadyExists` and the account is left untouched.
  pub async fn login_external(
    &self,
    kind: ProviderKind,
    external: ExternalUser,
  ) -> Result<ExternalLogin, AuthError> {
    if external.external_id.trim().is_empty() {
      return Err(AuthError::Validation(ValidationError::MissingField {
        field: "provider_id".to_string(),
      }));
    }
    if kind.uses_password() {
      return Err(AuthError::Validation(ValidationError::InvalidField {
        field: "provider".to_string(),
      }));
    }

    if let Some(binding) = self
      .provider_repo
      .find_by_provider_key(&kind, &external.external_id)
      .await?
    {
      tracing::info!(user_id = %binding.user_id, provider = %kind, "External login with known binding");
      return Ok(ExternalLogin {
        user_id: binding.user_id,
        access_token: self.issue_access_token(binding.user_id)?,
        is_new_user: false,
      });
    }

    let email = Email::new(external.email.as_str())?;
    let (user_id, is_new_user) = self.resolve_external_user(&kind, &email, &external).await?;

    self.ensure_profile(user_id, &external).await?;

    tracing::info!(user_id = %user_id, provider = %kind, is_new_user, "External login succeeded");

    Ok(ExternalLogin {
      user_id,
      access_token: self.issue_access_token(user_id)?,
      is_new_user,
    })
  }

  async fn resolve_external_user(
    &self,
    kind: &ProviderKind,
    email: &Email,
    external: &ExternalUser,
  ) -> Result<(Uuid, bool), AuthError> {
    if let Some(user) = self.user_repo.find_by_email(email).await? {
      let user_id = self.link_existing(user, kind, external).await?;
      return Ok((user_id, false));
    }

    let user = User::new(email);
    let binding = UserProvider::external(user.id, kind.clone(), external.external_id.clone());

    match self.user_repo.create_with_provider(user, binding).await {
      Ok((user, _)) => Ok((user.id, true)),
      Err(e) if e.is_duplicate_key() => {
        // A concurrent login created the binding or the email first
        if let Some(binding) = self
          .provider_repo
          .find_by_provider_key(kind, &external.external_id)
          .await?
        {
          return Ok((binding.user_id, false));
        }

        let user = self
          .user_repo
          .find_by_email(email)
          .await?
          .ok_or_else(|| AuthError::UserCreationFailed(e.to_string()))?;
        let user_id = self.link_existing(user, kind, external).await?;
        Ok((user_id, false))
      }
      Err(AuthError::Repository(e)) => Err(AuthError::UserCreationFailed(e.to_string())),
      Err(e) => Err(e),
    }
  }

  async fn link_existing(
    &self,
    user: User,
    kind: &ProviderKind,
    external: &ExternalUser,
  ) -> Result<Uuid, AuthError> {
    if !external.verified {
      tracing::warn!(user_id = %user.id, provider = %kind, "Refusing to link unverified external identity");
      return Err(AuthError::EmailAlreadyExists);
    }

    self.link_provider(user.id, kind, &external.external_id).await
  }

  async fn link_provider(
    &self,
    user_id: Uuid,
    kind: &ProviderKind,
    external_id: &str,
  ) -> Result<Uuid, AuthError> {
    let binding = UserProvider::external(user_id, kind.clone(), external_id.to_string());

    match self.provider_repo.create(binding).await {
      Ok(binding) => Ok(binding.user_id),
      Err(e) if e.is_duplicate_key() => {
        let existing = self
          .provider_repo
          .find_by_provider_key(kind, external_id)
          .await?
          .ok_or(e)?;
        Ok(existing.user_id)
      }
      Err(e) => Err(e),
    }
  }

  async fn ensure_profile(&self, user_id: Uuid, external: &ExternalUser) -> Result<(), AuthError> {
    let name = external.name.trim();
    if name.is_empty() {
      return Ok(());
    }

    if self.profile_repo.find_by_user_id(user_id).await?.is_some() {
      return Ok(());
    }

    let profile = UserProfile::new(user_id, name.to_string(), external.avatar_url.clone());
    match self.profile_repo.create(profile).await {
      Ok(_) => Ok(()),
      Err(e) if e.is_duplicate_key() => Ok(()),
      Err(e) => Err(e),
    }
  }

  /// Persists a new session
  ///
  /// The refresh token and expiry come from the caller; no default expiry is
  /// applied here.
  pub async fn create_session(&self, new_session: NewSession) -> Result<UserSession, AuthError> {
    let session = UserSession::new(
      new_session.user_id,
      new_session.refresh_token.hash(),
      new_session.device.user_agent,
      new_session.device.ip_address,
      new_session.expires_at,
    );

    self.session_repo.create(session).await
  }

  /// Issues a new access token for a valid session
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if the session is unknown, expired or revoked
  pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<(UserSession, String), AuthError> {
    let session = self
      .session_repo
      .find_by_refresh_token_hash(&refresh_token.hash())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if !session.is_valid() {
      return Err(AuthError::InvalidSession);
    }

    let access_token = self.issue_access_token(session.user_id)?;
    Ok((session, access_token))
  }

  /// Revokes the session holding the refresh token
  pub async fn logout(&self, refresh_token: &RefreshToken) -> Result<(), AuthError> {
    let session = self
      .session_repo
      .find_by_refresh_token_hash(&refresh_token.hash())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_revoked() {
      return Ok(());
    }

    self.session_repo.revoke(session.id, Utc::now()).await?;
    tracing::info!(user_id = %session.user_id, session_id = %session.id, "Session revoked");

    Ok(())
  }

  /// Loads a user and its profile
  pub async fn current_user(&self, user_id: Uuid) -> Result<(User, Option<UserProfile>), AuthError> {
    let user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::UserNotFound)?;
    let profile = self.profile_repo.find_by_user_id(user_id).await?;

    Ok((user, profile))
  }

  /// Signs an access token for the user
  pub fn issue_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
    self.token_service.generate(&TokenParams { user_id })
  }
}
