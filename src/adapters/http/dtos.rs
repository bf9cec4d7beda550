use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Requests only check presence and size here; formats and the password
// policy are enforced by the domain value objects.

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(length(min = 1, max = 254, message = "Email is required"))]
  pub email: String,

  #[validate(length(min = 1, max = 128, message = "Password must be at most 128 characters"))]
  pub password: String,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(length(min = 1, message = "Email is required"))]
  pub email: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Query of the Google redirect endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleRedirectQuery {
  pub state: Option<String>,
}

/// Query Google appends to the callback URL
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCallbackQuery {
  pub code: Option<String>,
  pub state: Option<String>,
  /// Set instead of `code` when the user denied consent
  pub error: Option<String>,
}

/// Response after successful user registration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
  pub id: Uuid,
  pub email: String,
  pub created_at: DateTime<Utc>,
}

/// Response carrying a freshly issued access token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
  pub access_token: String,
}

/// Response after an external identity login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLoginResponse {
  pub access_token: String,
  pub is_new_user: bool,
}

/// Response of the Google redirect endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RedirectResponse {
  pub url: String,
  pub state: String,
}

/// Response containing current user information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
  pub user_id: Uuid,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
  /// Stable error code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Localization key of the message
  pub message_key: String,
}
