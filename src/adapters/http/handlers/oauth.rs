use actix_web::{HttpResponse, web};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::adapters::http::{
  dtos::{ExternalLoginResponse, GoogleCallbackQuery, GoogleRedirectQuery, RedirectResponse},
  errors::ApiError,
};
use crate::application::auth::{
  LoginGoogleCommand, LoginGoogleUseCase, RedirectGoogleCommand, RedirectGoogleUseCase,
};
use crate::domain::auth::errors::AuthError;

/// Starts the Google sign-in flow
///
/// GET /api/v1/auth/google/redirect?state=...
/// Response: the consent screen URL and the state it carries
pub async fn google_redirect_handler(
  query: web::Query<GoogleRedirectQuery>,
  use_case: web::Data<Arc<RedirectGoogleUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute(RedirectGoogleCommand {
    state: query.into_inner().state,
  });

  Ok(HttpResponse::Ok().json(RedirectResponse {
    url: response.url,
    state: response.state,
  }))
}

/// Completes the Google sign-in flow
///
/// GET /api/v1/auth/google/callback?code=...&state=...
///
/// The exchange is tied to the server shutdown token, so a stopping server
/// does not wait on Google.
pub async fn google_callback_handler(
  query: web::Query<GoogleCallbackQuery>,
  use_case: web::Data<Arc<LoginGoogleUseCase>>,
  shutdown: web::Data<CancellationToken>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();

  if let Some(error) = query.error {
    return Err(AuthError::OAuth(format!("consent denied: {}", error)).into());
  }

  let code = query.code.ok_or_else(|| {
    ApiError::validation("missing_field", "Missing required field: code")
  })?;

  tracing::debug!(state = ?query.state, "Google callback received");

  let response = use_case
    .execute(LoginGoogleCommand { code }, shutdown.child_token())
    .await?;

  Ok(HttpResponse::Ok().json(ExternalLoginResponse {
    access_token: response.access_token,
    is_new_user: response.is_new_user,
  }))
}
