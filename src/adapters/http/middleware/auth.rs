use actix_web::{
  Error, HttpMessage, HttpRequest, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};
use uuid::Uuid;

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::auth::ports::TokenService,
};

/// Identity of the caller, attached to request extensions by [`AuthMiddleware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

/// Bearer authentication middleware
///
/// Reads `Authorization: Bearer <jwt>`, checks signature and expiry with the
/// [`TokenService`] and attaches an [`AuthenticatedUser`] to the request.
/// Anything else is answered with 401 `invalid_token` without reaching the
/// wrapped service. No database lookup happens here.
pub struct AuthMiddleware {
  token_service: Arc<dyn TokenService>,
}

impl AuthMiddleware {
  pub fn new(token_service: Arc<dyn TokenService>) -> Self {
    Self { token_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      token_service: self.token_service.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  token_service: Arc<dyn TokenService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    let claims = extract_bearer_token(&req)
      .and_then(|token| self.token_service.verify(&token).map_err(ApiError::from));

    Box::pin(async move {
      let claims = match claims {
        Ok(claims) => claims,
        Err(e) => {
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
      });

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| s.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extension trait to read the authenticated user in handlers
pub trait AuthUser {
  /// Returns `InvalidToken` when the route is not behind [`AuthMiddleware`]
  fn authenticated_user(&self) -> Result<AuthenticatedUser, ApiError>;
}

impl AuthUser for HttpRequest {
  fn authenticated_user(&self) -> Result<AuthenticatedUser, ApiError> {
    self
      .extensions()
      .get::<AuthenticatedUser>()
      .copied()
      .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
  }
}
