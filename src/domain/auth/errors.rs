use thiserror::Error;

/// Main authentication error type
///
/// This is the closed set of outcomes a command handler can fail with. The
/// presentation layer switches on the variant (or on [`AuthError::code`]) to
/// build a response; handlers never retry or swallow these.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Account only supports social login")]
  SocialLoginOnly,

  #[error("Email already exists")]
  EmailAlreadyExists,

  #[error("Invalid email format")]
  InvalidEmailFormat,

  #[error("Failed to create user: {0}")]
  UserCreationFailed(String),

  #[error("User not found")]
  UserNotFound,

  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("Invalid or expired access token")]
  InvalidToken,

  #[error("Failed to generate token: {0}")]
  TokenGeneration(String),

  #[error("OAuth provider error: {0}")]
  OAuth(String),

  #[error("OAuth code exchange was cancelled")]
  OAuthCancelled,

  #[error("OAuth code exchange timed out")]
  OAuthTimeout,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Validation error: {0}")]
  Validation(ValidationError),
}

impl AuthError {
  /// Stable machine-readable code for this error kind
  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidCredentials => "invalid_credentials",
      Self::SocialLoginOnly => "social_login_only",
      Self::EmailAlreadyExists => "email_already_exists",
      Self::InvalidEmailFormat => "invalid_email_format",
      Self::UserCreationFailed(_) => "user_creation_failed",
      Self::UserNotFound => "user_not_found",
      Self::InvalidSession => "invalid_session",
      Self::InvalidToken => "invalid_token",
      Self::TokenGeneration(_) => "token_generation_failed",
      Self::OAuth(_) => "oauth_failed",
      Self::OAuthCancelled => "oauth_cancelled",
      Self::OAuthTimeout => "oauth_timeout",
      Self::Repository(_) => "repository_error",
      Self::Hash(_) => "hash_error",
      Self::Validation(err) => err.code(),
    }
  }

  /// Key of the localized message for this error kind
  pub fn message_key(&self) -> String {
    format!("auth.error.{}", self.code())
  }

  /// True when the persistence layer rejected a write on a uniqueness constraint
  pub fn is_duplicate_key(&self) -> bool {
    matches!(self, AuthError::Repository(RepositoryError::DuplicateKey(_)))
  }
}

// Invalid emails surface as their own kind, everything else stays a validation error.
impl From<ValidationError> for AuthError {
  fn from(error: ValidationError) -> Self {
    match error {
      ValidationError::InvalidEmail => AuthError::InvalidEmailFormat,
      other => AuthError::Validation(other),
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Transaction failed: {0}")]
  TransactionFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Invalid stored value: {0}")]
  InvalidData(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Password too short, minimum {min} characters required")]
  PasswordTooShort { min: usize },

  #[error("Password must contain at least one uppercase letter")]
  PasswordMissingUppercase,

  #[error("Password must contain at least one lowercase letter")]
  PasswordMissingLowercase,

  #[error("Password must contain at least one digit")]
  PasswordMissingDigit,

  #[error("Password must contain at least one special character")]
  PasswordMissingSpecial,

  #[error("Invalid field: {field}")]
  InvalidField { field: String },

  #[error("Missing required field: {field}")]
  MissingField { field: String },
}

impl ValidationError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidEmail => "invalid_email_format",
      Self::PasswordTooShort { .. } => "password_too_short",
      Self::PasswordMissingUppercase => "password_missing_uppercase",
      Self::PasswordMissingLowercase => "password_missing_lowercase",
      Self::PasswordMissingDigit => "password_missing_digit",
      Self::PasswordMissingSpecial => "password_missing_special",
      Self::InvalidField { .. } => "invalid_field",
      Self::MissingField { .. } => "missing_field",
    }
  }
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_invalid_email_maps_to_dedicated_kind() {
    let error: AuthError = ValidationError::InvalidEmail.into();
    assert!(matches!(error, AuthError::InvalidEmailFormat));
    assert_eq!(error.code(), "invalid_email_format");
  }

  #[test]
  fn test_password_policy_errors_keep_their_code() {
    let error: AuthError = ValidationError::PasswordMissingDigit.into();
    assert!(matches!(
      error,
      AuthError::Validation(ValidationError::PasswordMissingDigit)
    ));
    assert_eq!(error.code(), "password_missing_digit");
    assert_eq!(error.message_key(), "auth.error.password_missing_digit");
  }

  #[test]
  fn test_duplicate_key_detection() {
    let error = AuthError::Repository(RepositoryError::DuplicateKey("users_email_key".into()));
    assert!(error.is_duplicate_key());
    assert!(!AuthError::InvalidCredentials.is_duplicate_key());
  }
}
