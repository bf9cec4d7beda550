use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::ValidationError;

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  const MAX_LENGTH: usize = 254;
  const MAX_LOCAL_LENGTH: usize = 64;
  const MAX_DOMAIN_LENGTH: usize = 255;
  const MAX_LABEL_LENGTH: usize = 63;

  /// Creates a new Email after validation
  ///
  /// The first rule that fails short-circuits with `ValidationError::InvalidEmail`.
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    let email = email.into();
    let email = email.trim();

    Self::validate(email)?;

    // Normalize to lowercase
    Ok(Self(email.to_lowercase()))
  }

  fn validate(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.len() > Self::MAX_LENGTH {
      return Err(ValidationError::InvalidEmail);
    }

    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;
    if domain.contains('@') {
      return Err(ValidationError::InvalidEmail);
    }

    Self::validate_local_part(local)?;
    Self::validate_domain(domain)
  }

  fn validate_local_part(local: &str) -> Result<(), ValidationError> {
    if local.is_empty() || local.len() > Self::MAX_LOCAL_LENGTH {
      return Err(ValidationError::InvalidEmail);
    }

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
      return Err(ValidationError::InvalidEmail);
    }

    // RFC 5322 atext plus the dot separator
    let allowed = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-.".contains(c);
    if !local.chars().all(allowed) {
      return Err(ValidationError::InvalidEmail);
    }

    Ok(())
  }

  fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if domain.is_empty() || domain.len() > Self::MAX_DOMAIN_LENGTH {
      return Err(ValidationError::InvalidEmail);
    }

    for label in domain.split('.') {
      if label.is_empty() || label.len() > Self::MAX_LABEL_LENGTH {
        return Err(ValidationError::InvalidEmail);
      }

      if label.starts_with('-') || label.ends_with('-') {
        return Err(ValidationError::InvalidEmail);
      }

      if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidEmail);
      }
    }

    Ok(())
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  pub const MIN_LENGTH: usize = 8;

  /// Creates a new Password that satisfies the strength policy
  ///
  /// Used for registration. See [`Password::check_strength`] for the rules.
  pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = password.into();
    Self::check_strength(&password)?;
    Ok(Self(password))
  }

  /// Wraps a password presented for verification
  ///
  /// Login never applies the strength policy, only presence.
  pub fn for_verification(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = password.into();
    if password.is_empty() {
      return Err(ValidationError::MissingField {
        field: "password".to_string(),
      });
    }
    Ok(Self(password))
  }

  /// Checks the strength policy
  ///
  /// Every rule is evaluated over the whole string, then the first failing
  /// rule is reported in the order: length, uppercase, lowercase, digit, symbol.
  pub fn check_strength(password: &str) -> Result<(), ValidationError> {
    let mut length = 0;
    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for c in password.chars() {
      length += 1;
      has_upper |= c.is_uppercase();
      has_lower |= c.is_lowercase();
      has_digit |= c.is_numeric();
      has_symbol |= c.is_ascii_punctuation()
        || (!c.is_alphanumeric() && !c.is_whitespace() && !c.is_control());
    }

    if length < Self::MIN_LENGTH {
      return Err(ValidationError::PasswordTooShort {
        min: Self::MIN_LENGTH,
      });
    }
    if !has_upper {
      return Err(ValidationError::PasswordMissingUppercase);
    }
    if !has_lower {
      return Err(ValidationError::PasswordMissingLowercase);
    }
    if !has_digit {
      return Err(ValidationError::PasswordMissingDigit);
    }
    if !has_symbol {
      return Err(ValidationError::PasswordMissingSpecial);
    }

    Ok(())
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a PasswordHash from an encoded hash string (PHC format)
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValidationError> {
    let hash = hash.into();
    if !hash.starts_with('$') {
      return Err(ValidationError::InvalidField {
        field: "password_hash".to_string(),
      });
    }
    Ok(Self(hash))
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// RefreshToken Value Object (Random Secure Token)
// ============================================================================

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RefreshToken(String);

impl RefreshToken {
  /// Wraps a refresh token presented by a client or produced by a generator
  pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
    let token = token.into();
    if token.trim().is_empty() {
      return Err(ValidationError::MissingField {
        field: "refresh_token".to_string(),
      });
    }
    Ok(Self(token))
  }

  /// Creates a hash of this token for storage
  pub fn hash(&self) -> TokenHash {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());
    let result = hasher.finalize();

    TokenHash(hex::encode(result))
  }

  /// Returns the token as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the token
impl fmt::Debug for RefreshToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("RefreshToken(***)")
  }
}

// ============================================================================
// TokenHash Value Object (SHA-256 Hash of Token)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
  /// Creates a TokenHash from an existing hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValidationError> {
    let hash = hash.into();

    // SHA-256 produces 64 hex characters
    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(ValidationError::InvalidField {
        field: "refresh_token_hash".to_string(),
      });
    }

    Ok(Self(hash))
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for TokenHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// ProviderKind Enum
// ============================================================================

/// Login method a provider binding stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ProviderKind {
  /// Local email + password credentials
  Password,
  /// Google OpenID Connect
  Google,
  /// Any other external identity provider, by lowercase name
  Social(String),
}

impl ProviderKind {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Password => "password",
      Self::Google => "google",
      Self::Social(name) => name,
    }
  }

  /// Whether bindings of this kind carry a password hash
  pub fn uses_password(&self) -> bool {
    matches!(self, Self::Password)
  }
}

impl FromStr for ProviderKind {
  type Err = ValidationError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    let name = value.trim().to_lowercase();
    match name.as_str() {
      "" => Err(ValidationError::MissingField {
        field: "provider".to_string(),
      }),
      "password" => Ok(Self::Password),
      "google" => Ok(Self::Google),
      other if other.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') => {
        Ok(Self::Social(other.to_string()))
      }
      _ => Err(ValidationError::InvalidField {
        field: "provider".to_string(),
      }),
    }
  }
}

impl TryFrom<String> for ProviderKind {
  type Error = ValidationError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<ProviderKind> for String {
  fn from(kind: ProviderKind) -> Self {
    kind.as_str().to_string()
  }
}

impl fmt::Display for ProviderKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_email_validation() {
    assert!(Email::new("user@example.com").is_ok());
    assert!(Email::new("user.name+tag@domain.co.uk").is_ok());

    assert!(Email::new("invalid").is_err());
    assert!(Email::new("@example.com").is_err());
    assert!(Email::new("test@").is_err());
    assert!(Email::new("a@b@example.com").is_err());
  }

  #[test]
  fn test_email_rejects_doubled_dot() {
    assert_eq!(
      Email::new("a..b@example.com"),
      Err(ValidationError::InvalidEmail)
    );
    assert!(Email::new(".ab@example.com").is_err());
    assert!(Email::new("ab.@example.com").is_err());
  }

  #[test]
  fn test_email_rejects_bad_domain_labels() {
    assert!(Email::new("user@-example.com").is_err());
    assert!(Email::new("user@example-.com").is_err());
    assert!(Email::new("user@example..com").is_err());
    assert!(Email::new("user@exa_mple.com").is_err());

    let long_label = "a".repeat(64);
    assert!(Email::new(format!("user@{}.com", long_label)).is_err());
  }

  #[test]
  fn test_email_length_limits() {
    let local = "a".repeat(65);
    assert!(Email::new(format!("{}@example.com", local)).is_err());

    let local = "a".repeat(64);
    assert!(Email::new(format!("{}@example.com", local)).is_ok());

    // 64 + 1 + 190 = 255 characters, over the total limit
    let domain = format!("{}.{}.{}.com", "b".repeat(62), "c".repeat(62), "d".repeat(60));
    assert!(Email::new(format!("{}@{}", "a".repeat(64), domain)).is_err());
  }

  #[test]
  fn test_email_normalization() {
    let email = Email::new("  Test@Example.COM ").unwrap();
    assert_eq!(email.as_str(), "test@example.com");
  }

  #[test]
  fn test_password_policy_reports_first_failing_rule() {
    assert_eq!(
      Password::check_strength("short1!"),
      Err(ValidationError::PasswordTooShort { min: 8 })
    );
    assert_eq!(
      Password::check_strength("alllowercase1!"),
      Err(ValidationError::PasswordMissingUppercase)
    );
    assert_eq!(
      Password::check_strength("ALLUPPER1!"),
      Err(ValidationError::PasswordMissingLowercase)
    );
    assert_eq!(
      Password::check_strength("NoDigits!"),
      Err(ValidationError::PasswordMissingDigit)
    );
    assert_eq!(
      Password::check_strength("NoSymbol123"),
      Err(ValidationError::PasswordMissingSpecial)
    );
    assert!(Password::check_strength("Valid1Pass!").is_ok());
  }

  #[test]
  fn test_password_policy_length_wins_over_other_rules() {
    // Fails every rule, length is reported
    assert_eq!(
      Password::check_strength("abc"),
      Err(ValidationError::PasswordTooShort { min: 8 })
    );
  }

  #[test]
  fn test_password_for_verification_skips_policy() {
    assert!(Password::for_verification("weak").is_ok());
    assert!(Password::for_verification("").is_err());
  }

  #[test]
  fn test_password_debug_is_redacted() {
    let password = Password::new("Valid1Pass!").unwrap();
    assert_eq!(format!("{:?}", password), "Password(***)");
  }

  #[test]
  fn test_refresh_token_hashing() {
    let token = RefreshToken::new("some-refresh-token").unwrap();
    let hash = token.hash();

    assert_eq!(hash.as_str().len(), 64);
    assert_eq!(hash, RefreshToken::new("some-refresh-token").unwrap().hash());
    assert_ne!(hash, RefreshToken::new("other-token").unwrap().hash());
    assert!(TokenHash::from_hash(hash.into_inner()).is_ok());
  }

  #[test]
  fn test_refresh_token_rejects_empty() {
    assert!(RefreshToken::new("   ").is_err());
  }

  #[test]
  fn test_provider_kind_parsing() {
    assert_eq!("password".parse::<ProviderKind>(), Ok(ProviderKind::Password));
    assert_eq!("Google".parse::<ProviderKind>(), Ok(ProviderKind::Google));
    assert_eq!(
      "github".parse::<ProviderKind>(),
      Ok(ProviderKind::Social("github".to_string()))
    );
    assert!("".parse::<ProviderKind>().is_err());
    assert!("git hub".parse::<ProviderKind>().is_err());
  }

  #[test]
  fn test_provider_kind_serializes_as_string() {
    let json = serde_json::to_string(&ProviderKind::Social("apple".into())).unwrap();
    assert_eq!(json, "\"apple\"");

    let kind: ProviderKind = serde_json::from_str("\"google\"").unwrap();
    assert_eq!(kind, ProviderKind::Google);
  }
}
