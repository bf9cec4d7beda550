use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{User, UserProfile, UserProvider, UserSession},
  errors::{AuthError, RepositoryError},
  ports::{SessionRepository, UserProfileRepository, UserProviderRepository, UserRepository},
  value_objects::{Email, ProviderKind, TokenHash},
};

#[derive(Default)]
struct Store {
  users: HashMap<Uuid, User>,
  providers: HashMap<(ProviderKind, String), UserProvider>,
  profiles: HashMap<Uuid, UserProfile>,
  sessions: HashMap<Uuid, UserSession>,
}

impl Store {
  fn check_user(&self, user: &User) -> Result<(), AuthError> {
    if self.users.contains_key(&user.id) {
      return Err(duplicate("users_pkey"));
    }
    if self.users.values().any(|u| u.email == user.email) {
      return Err(duplicate("users_email_key"));
    }
    Ok(())
  }

  fn check_provider(&self, provider: &UserProvider) -> Result<(), AuthError> {
    let key = (provider.provider.clone(), provider.provider_key.clone());
    if self.providers.contains_key(&key) {
      return Err(duplicate("user_providers_provider_key_key"));
    }
    Ok(())
  }
}

fn duplicate(constraint: &str) -> AuthError {
  AuthError::Repository(RepositoryError::DuplicateKey(constraint.to_string()))
}

/// In-memory persistence for all auth repositories
///
/// Clones share one store, so a single instance can back every repository
/// port. Unique constraints mirror the database schema and are reported as
/// `DuplicateKey`.
#[derive(Default, Clone)]
pub struct InMemoryRepository {
  store: Arc<RwLock<Store>>,
}

impl InMemoryRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn user_count(&self) -> usize {
    self.store.read().await.users.len()
  }

  pub async fn provider_count(&self) -> usize {
    self.store.read().await.providers.len()
  }

  pub async fn profile_count(&self) -> usize {
    self.store.read().await.profiles.len()
  }

  pub async fn session_count(&self) -> usize {
    self.store.read().await.sessions.len()
  }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut store = self.store.write().await;
    store.check_user(&user)?;
    store.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn create_with_provider(
    &self,
    user: User,
    provider: UserProvider,
  ) -> Result<(User, UserProvider), AuthError> {
    // Both checks run under one write lock, nothing is inserted unless both pass
    let mut store = self.store.write().await;
    store.check_user(&user)?;
    store.check_provider(&provider)?;

    store.users.insert(user.id, user.clone());
    store.providers.insert(
      (provider.provider.clone(), provider.provider_key.clone()),
      provider.clone(),
    );

    Ok((user, provider))
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    Ok(self.store.read().await.users.get(&id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let store = self.store.read().await;
    Ok(
      store
        .users
        .values()
        .find(|user| user.email == email.as_str())
        .cloned(),
    )
  }

  async fn find_by_provider(
    &self,
    provider: &ProviderKind,
    provider_key: &str,
  ) -> Result<Option<User>, AuthError> {
    let store = self.store.read().await;
    Ok(
      store
        .providers
        .get(&(provider.clone(), provider_key.to_string()))
        .and_then(|binding| store.users.get(&binding.user_id))
        .cloned(),
    )
  }
}

#[async_trait]
impl UserProviderRepository for InMemoryRepository {
  async fn find_by_provider_key(
    &self,
    provider: &ProviderKind,
    provider_key: &str,
  ) -> Result<Option<UserProvider>, AuthError> {
    let store = self.store.read().await;
    Ok(
      store
        .providers
        .get(&(provider.clone(), provider_key.to_string()))
        .cloned(),
    )
  }

  async fn create(&self, provider: UserProvider) -> Result<UserProvider, AuthError> {
    let mut store = self.store.write().await;
    store.check_provider(&provider)?;
    if !store.users.contains_key(&provider.user_id) {
      return Err(AuthError::Repository(RepositoryError::DatabaseError(
        "user_providers_user_id_fkey".to_string(),
      )));
    }

    store.providers.insert(
      (provider.provider.clone(), provider.provider_key.clone()),
      provider.clone(),
    );
    Ok(provider)
  }
}

#[async_trait]
impl UserProfileRepository for InMemoryRepository {
  async fn create(&self, profile: UserProfile) -> Result<UserProfile, AuthError> {
    let mut store = self.store.write().await;
    if store.profiles.contains_key(&profile.user_id) {
      return Err(duplicate("user_profiles_user_id_key"));
    }

    store.profiles.insert(profile.user_id, profile.clone());
    Ok(profile)
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, AuthError> {
    Ok(self.store.read().await.profiles.get(&user_id).cloned())
  }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
  async fn create(&self, session: UserSession) -> Result<UserSession, AuthError> {
    let mut store = self.store.write().await;
    if store
      .sessions
      .values()
      .any(|s| s.refresh_token_hash == session.refresh_token_hash)
    {
      return Err(duplicate("user_sessions_refresh_token_hash_key"));
    }

    store.sessions.insert(session.id, session.clone());
    Ok(session)
  }

  async fn find_by_refresh_token_hash(
    &self,
    token_hash: &TokenHash,
  ) -> Result<Option<UserSession>, AuthError> {
    let store = self.store.read().await;
    Ok(
      store
        .sessions
        .values()
        .find(|s| s.refresh_token_hash == token_hash.as_str())
        .cloned(),
    )
  }

  async fn revoke(&self, session_id: Uuid, revoked_at: DateTime<Utc>) -> Result<(), AuthError> {
    let mut store = self.store.write().await;
    let session = store
      .sessions
      .get_mut(&session_id)
      .ok_or(AuthError::Repository(RepositoryError::NotFound))?;

    session.revoke(revoked_at);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::{PasswordHash, RefreshToken};

  fn password_binding(user: &User) -> UserProvider {
    let email = Email::new(user.email.as_str()).unwrap();
    let hash = PasswordHash::from_hash("$argon2id$v=19$m=4096,t=1,p=1$salt$hash").unwrap();
    UserProvider::password(user.id, &email, hash)
  }

  #[tokio::test]
  async fn test_create_with_provider_is_all_or_nothing() {
    let repo = InMemoryRepository::new();
    let email = Email::new("a@example.com").unwrap();

    let first = User::new(&email);
    let binding = password_binding(&first);
    repo.create_with_provider(first, binding).await.unwrap();

    // Same email again, the binding must not be inserted either
    let second = User::new(&email);
    let binding = UserProvider::external(second.id, ProviderKind::Google, "g-1".into());
    let result = repo.create_with_provider(second, binding).await;

    assert!(result.unwrap_err().is_duplicate_key());
    assert_eq!(repo.user_count().await, 1);
    assert_eq!(repo.provider_count().await, 1);
  }

  #[tokio::test]
  async fn test_provider_pair_is_unique() {
    let repo = InMemoryRepository::new();
    let user = User::new(&Email::new("b@example.com").unwrap());
    UserRepository::create(&repo, user.clone()).await.unwrap();

    let binding = UserProvider::external(user.id, ProviderKind::Google, "g-2".into());
    UserProviderRepository::create(&repo, binding).await.unwrap();

    let again = UserProvider::external(user.id, ProviderKind::Google, "g-2".into());
    let result = UserProviderRepository::create(&repo, again).await;
    assert!(result.unwrap_err().is_duplicate_key());

    let other_kind = UserProvider::external(user.id, ProviderKind::Social("github".into()), "g-2".into());
    assert!(UserProviderRepository::create(&repo, other_kind).await.is_ok());

    let found = repo
      .find_by_provider(&ProviderKind::Google, "g-2")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.id, user.id);
  }

  #[tokio::test]
  async fn test_one_profile_per_user() {
    let repo = InMemoryRepository::new();
    let user_id = Uuid::new_v4();

    UserProfileRepository::create(&repo, UserProfile::new(user_id, "A".into(), None))
      .await
      .unwrap();
    let result =
      UserProfileRepository::create(&repo, UserProfile::new(user_id, "B".into(), None)).await;

    assert!(result.unwrap_err().is_duplicate_key());
    let profile = repo.find_by_user_id(user_id).await.unwrap().unwrap();
    assert_eq!(profile.name, "A");
  }

  #[tokio::test]
  async fn test_revoke_session_keeps_row() {
    let repo = InMemoryRepository::new();
    let token = RefreshToken::new("token").unwrap();
    let session = UserSession::new(Uuid::new_v4(), token.hash(), None, None, None);
    SessionRepository::create(&repo, session.clone()).await.unwrap();

    repo.revoke(session.id, Utc::now()).await.unwrap();

    let stored = repo
      .find_by_refresh_token_hash(&token.hash())
      .await
      .unwrap()
      .unwrap();
    assert!(stored.is_revoked());
    assert_eq!(repo.session_count().await, 1);

    let missing = repo.revoke(Uuid::new_v4(), Utc::now()).await;
    assert!(matches!(
      missing,
      Err(AuthError::Repository(RepositoryError::NotFound))
    ));
  }
}
