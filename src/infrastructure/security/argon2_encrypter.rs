use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordEncrypter;
use crate::domain::auth::value_objects::{Password, PasswordHash};
use crate::infrastructure::config::PasswordHashConfig;

/// Argon2id password encrypter
///
/// Cost parameters come from [`PasswordHashConfig`]; the defaults are
/// 19 MiB memory, 2 iterations and 1 lane. Hashes are stored in PHC string
/// format, so verification reads the parameters back from the hash itself.
pub struct Argon2PasswordEncrypter {
  argon2: Argon2<'static>,
}

impl Argon2PasswordEncrypter {
  pub fn new(config: &PasswordHashConfig) -> Result<Self, AuthError> {
    let params = Params::new(
      config.memory_kib,
      config.iterations,
      config.parallelism,
      Some(32),
    )
    .map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }
}

#[async_trait]
impl PasswordEncrypter for Argon2PasswordEncrypter {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = self
      .argon2
      .hash_password(password.as_str().as_bytes(), &salt)
      .map_err(|e| AuthError::Hash(HashError::HashingFailed(e.to_string())))?;

    PasswordHash::from_hash(hash.to_string()).map_err(|_| AuthError::Hash(HashError::InvalidFormat))
  }

  /// Verifies a password against a stored hash
  ///
  /// A mismatch is `Ok(false)`; only a malformed hash is an error.
  async fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, AuthError> {
    let parsed_hash = Argon2PasswordHash::new(hash.as_str()).map_err(|e| {
      AuthError::Hash(HashError::VerificationFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })?;

    // verify_password compares in constant time
    match self
      .argon2
      .verify_password(password.as_str().as_bytes(), &parsed_hash)
    {
      Ok(_) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(AuthError::Hash(HashError::VerificationFailed(e.to_string()))),
    }
  }
}
