use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use super::{extract_ip_address, extract_user_agent};
use crate::adapters::http::{
  cookies::RefreshCookie,
  dtos::{
    CurrentUserResponse, LoginRequest, RegisterRequest, RegisterResponse, SuccessResponse,
    TokenResponse,
  },
  errors::{ApiError, AuthErrorKind},
  middleware::AuthUser,
};
use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserCommand, LoginUserUseCase, LogoutUserCommand,
  LogoutUserUseCase, RefreshAccessTokenCommand, RefreshAccessTokenUseCase, RegisterUserCommand,
  RegisterUserUseCase,
};

fn refresh_token_from_cookie(
  req: &HttpRequest,
  refresh_cookie: &RefreshCookie,
) -> Result<String, ApiError> {
  req
    .cookie(refresh_cookie.name())
    .map(|cookie| cookie.value().to_string())
    .filter(|value| !value.is_empty())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidSession))
}

/// Handler for user registration
///
/// POST /api/v1/auth/register
/// Body: RegisterRequest (JSON)
/// Response: RegisterResponse (JSON) with status 201
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let response = use_case
    .execute(RegisterUserCommand {
      email: request.email,
      password: request.password,
    })
    .await?;

  Ok(HttpResponse::Created().json(RegisterResponse {
    id: response.user_id,
    email: response.email,
    created_at: response.created_at,
  }))
}

/// Handler for password login
///
/// POST /api/v1/auth/login
/// Body: LoginRequest (JSON)
/// Response: TokenResponse (JSON), refresh token in an HttpOnly cookie
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  refresh_cookie: web::Data<RefreshCookie>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let ip_address = extract_ip_address(&http_req);
  let user_agent = extract_user_agent(&http_req);

  let request = request.into_inner();
  let response = use_case
    .execute(
      LoginUserCommand {
        email: request.email,
        password: request.password,
      },
      ip_address,
      user_agent,
    )
    .await?;

  Ok(
    HttpResponse::Ok()
      .cookie(refresh_cookie.build(response.refresh_token))
      .json(TokenResponse {
        access_token: response.access_token,
      }),
  )
}

/// Handler issuing a new access token from the refresh cookie
///
/// POST /api/v1/auth/refresh
pub async fn refresh_handler(
  http_req: HttpRequest,
  use_case: web::Data<Arc<RefreshAccessTokenUseCase>>,
  refresh_cookie: web::Data<RefreshCookie>,
) -> Result<HttpResponse, ApiError> {
  let refresh_token = refresh_token_from_cookie(&http_req, &refresh_cookie)?;

  let response = use_case
    .execute(RefreshAccessTokenCommand { refresh_token })
    .await?;

  Ok(HttpResponse::Ok().json(TokenResponse {
    access_token: response.access_token,
  }))
}

/// Handler revoking the session of the refresh cookie
///
/// DELETE /api/v1/auth/refresh
///
/// Lives on the refresh path because the cookie is only sent there.
pub async fn logout_handler(
  http_req: HttpRequest,
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  refresh_cookie: web::Data<RefreshCookie>,
) -> Result<HttpResponse, ApiError> {
  let refresh_token = refresh_token_from_cookie(&http_req, &refresh_cookie)?;

  use_case.execute(LogoutUserCommand { refresh_token }).await?;

  Ok(
    HttpResponse::Ok()
      .cookie(refresh_cookie.removal())
      .json(SuccessResponse {
        message: "Logged out successfully".to_string(),
      }),
  )
}

/// Handler for getting current user information
///
/// GET /api/v1/auth/me
/// Headers: Authorization: Bearer <access token>
pub async fn get_current_user_handler(
  http_req: HttpRequest,
  use_case: web::Data<Arc<GetCurrentUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;

  let response = use_case.execute(user.user_id).await?;

  Ok(HttpResponse::Ok().json(CurrentUserResponse {
    user_id: response.user_id,
    email: response.email,
    name: response.name,
    avatar_url: response.avatar_url,
    created_at: response.created_at,
  }))
}

/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
