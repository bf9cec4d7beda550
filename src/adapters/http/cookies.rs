use actix_web::cookie::{Cookie, SameSite, time::Duration};

use crate::infrastructure::config::SessionConfig;

/// Builds the HttpOnly cookie that carries the refresh token
///
/// The cookie is scoped to the refresh path so it never travels with
/// ordinary API requests.
#[derive(Debug, Clone)]
pub struct RefreshCookie {
  name: String,
  path: String,
  secure: bool,
  max_age_seconds: i64,
}

impl RefreshCookie {
  pub fn new(config: &SessionConfig) -> Self {
    Self {
      name: config.cookie_name.clone(),
      path: config.cookie_path.clone(),
      secure: config.cookie_secure,
      max_age_seconds: config.refresh_token_ttl_seconds,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn build(&self, token: String) -> Cookie<'static> {
    Cookie::build(self.name.clone(), token)
      .path(self.path.clone())
      .http_only(true)
      .secure(self.secure)
      .same_site(SameSite::Strict)
      .max_age(Duration::seconds(self.max_age_seconds))
      .finish()
  }

  /// Cookie that makes the client drop the refresh token
  pub fn removal(&self) -> Cookie<'static> {
    let mut cookie = self.build(String::new());
    cookie.make_removal();
    cookie
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_refresh_cookie_attributes() {
    let cookie = RefreshCookie::new(&SessionConfig::default()).build("abc".to_string());
    let header = cookie.to_string();

    assert!(header.starts_with("refresh_token=abc"));
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("Secure"));
    assert!(header.contains("SameSite=Strict"));
    assert!(header.contains("Path=/api/v1/auth/refresh"));
    assert!(header.contains("Max-Age=2592000"));
  }

  #[test]
  fn test_removal_cookie_expires_immediately() {
    let cookie = RefreshCookie::new(&SessionConfig::default()).removal();

    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.path(), Some("/api/v1/auth/refresh"));
  }
}
