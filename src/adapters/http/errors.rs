use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::AuthError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation { code: String, message: String },

  /// Authentication error
  Auth(AuthErrorKind),

  /// Internal server error (500 Internal Server Error)
  ///
  /// The detail is logged, never sent to the client.
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Invalid credentials (401), also used for social-only accounts
  InvalidCredentials,

  /// Session expired, revoked or unknown (401)
  InvalidSession,

  /// Missing, malformed or expired bearer token (401)
  InvalidToken,

  /// Email already exists (409)
  EmailAlreadyExists,

  /// User not found (404)
  UserNotFound,

  /// Identity provider rejected the exchange (401)
  OAuthFailed,

  /// Server shut down during the provider exchange (503)
  OAuthCancelled,

  /// Identity provider did not answer in time (504)
  OAuthTimeout,
}

impl AuthErrorKind {
  fn code(self) -> &'static str {
    match self {
      AuthErrorKind::InvalidCredentials => "invalid_credentials",
      AuthErrorKind::InvalidSession => "invalid_session",
      AuthErrorKind::InvalidToken => "invalid_token",
      AuthErrorKind::EmailAlreadyExists => "email_already_exists",
      AuthErrorKind::UserNotFound => "user_not_found",
      AuthErrorKind::OAuthFailed => "oauth_failed",
      AuthErrorKind::OAuthCancelled => "oauth_cancelled",
      AuthErrorKind::OAuthTimeout => "oauth_timeout",
    }
  }

  fn message(self) -> &'static str {
    match self {
      AuthErrorKind::InvalidCredentials => "Invalid email or password",
      AuthErrorKind::InvalidSession => "Invalid or expired session",
      AuthErrorKind::InvalidToken => "Invalid or missing authorization token",
      AuthErrorKind::EmailAlreadyExists => "An account with this email already exists",
      AuthErrorKind::UserNotFound => "User not found",
      AuthErrorKind::OAuthFailed => "Sign-in with the identity provider failed",
      AuthErrorKind::OAuthCancelled => "Sign-in was interrupted, please try again",
      AuthErrorKind::OAuthTimeout => "The identity provider did not respond in time",
    }
  }
}

impl ApiError {
  pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
    ApiError::Validation {
      code: code.into(),
      message: message.into(),
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation { message, .. } => write!(f, "Validation error: {}", message),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidSession => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::EmailAlreadyExists => StatusCode::CONFLICT,
        AuthErrorKind::UserNotFound => StatusCode::NOT_FOUND,
        AuthErrorKind::OAuthFailed => StatusCode::UNAUTHORIZED,
        AuthErrorKind::OAuthCancelled => StatusCode::SERVICE_UNAVAILABLE,
        AuthErrorKind::OAuthTimeout => StatusCode::GATEWAY_TIMEOUT,
      },
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let (code, message) = match self {
      ApiError::Validation { code, message } => (code.as_str(), message.clone()),
      ApiError::Auth(kind) => (kind.code(), kind.message().to_string()),
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: code.to_string(),
      message,
      message_key: format!("auth.error.{}", code),
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      // Both look the same from outside so account kinds cannot be probed
      AuthError::InvalidCredentials | AuthError::SocialLoginOnly => {
        ApiError::Auth(AuthErrorKind::InvalidCredentials)
      }
      AuthError::EmailAlreadyExists => ApiError::Auth(AuthErrorKind::EmailAlreadyExists),
      AuthError::UserNotFound => ApiError::Auth(AuthErrorKind::UserNotFound),
      AuthError::InvalidSession => ApiError::Auth(AuthErrorKind::InvalidSession),
      AuthError::InvalidToken => ApiError::Auth(AuthErrorKind::InvalidToken),
      AuthError::InvalidEmailFormat => ApiError::validation(error.code(), error.to_string()),
      AuthError::Validation(err) => ApiError::validation(err.code(), err.to_string()),
      AuthError::OAuth(detail) => {
        tracing::warn!("OAuth exchange failed: {}", detail);
        ApiError::Auth(AuthErrorKind::OAuthFailed)
      }
      AuthError::OAuthCancelled => ApiError::Auth(AuthErrorKind::OAuthCancelled),
      AuthError::OAuthTimeout => ApiError::Auth(AuthErrorKind::OAuthTimeout),
      AuthError::UserCreationFailed(_)
      | AuthError::TokenGeneration(_)
      | AuthError::Repository(_)
      | AuthError::Hash(_) => ApiError::Internal(error.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::validation("validation_error", messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::{HashError, RepositoryError, ValidationError};
  use actix_web::body::to_bytes;

  async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.error_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::validation("x", "test").status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::EmailAlreadyExists).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::OAuthTimeout).status_code(),
      StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[actix_web::test]
  async fn test_social_only_and_wrong_password_are_indistinguishable() {
    let social = body_of(AuthError::SocialLoginOnly.into()).await;
    let wrong = body_of(AuthError::InvalidCredentials.into()).await;

    assert_eq!(social.0, StatusCode::UNAUTHORIZED);
    assert_eq!(social, wrong);
    assert_eq!(social.1["error"], "invalid_credentials");
  }

  #[actix_web::test]
  async fn test_internal_details_are_hidden() {
    let error: ApiError =
      AuthError::Repository(RepositoryError::QueryFailed("relation users does not exist".into()))
        .into();
    let (status, body) = body_of(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(!body.to_string().contains("relation users"));

    let error: ApiError = AuthError::Hash(HashError::InvalidFormat).into();
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[actix_web::test]
  async fn test_validation_error_carries_code_and_message_key() {
    let error: ApiError = AuthError::Validation(ValidationError::PasswordMissingDigit).into();
    let (status, body) = body_of(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password_missing_digit");
    assert_eq!(body["messageKey"], "auth.error.password_missing_digit");
  }
}
