use actix_web::{
  Error, HttpMessage,
  body::MessageBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
};
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID middleware
///
/// Reuses a well-formed `X-Request-ID` sent by the client (or a proxy in
/// front of the service), otherwise generates a UUID v4. The ID is stored in
/// request extensions, echoed in the response header and attached to a
/// tracing span wrapping the rest of the request, so every log line of one
/// login carries the same `request_id` field.
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware;

impl RequestIdMiddleware {
  pub fn new() -> Self {
    Self
  }
}

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = RequestIdMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RequestIdMiddlewareService {
      service: Rc::new(service),
    }))
  }
}

pub struct RequestIdMiddlewareService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    let request_id = incoming_request_id(&req).unwrap_or_default();
    req.extensions_mut().insert(request_id);

    let span = tracing::info_span!(
      "http_request",
      request_id = %request_id,
      method = %req.method(),
      path = %req.path(),
    );

    Box::pin(
      async move {
        let mut res = service.call(req).await?;

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
          res
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        Ok(res)
      }
      .instrument(span),
    )
  }
}

fn incoming_request_id(req: &ServiceRequest) -> Option<RequestId> {
  req
    .headers()
    .get(REQUEST_ID_HEADER)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| Uuid::parse_str(value.trim()).ok())
    .map(RequestId)
}

/// Request ID stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn value(&self) -> Uuid {
    self.0
  }
}

impl Default for RequestId {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Display for RequestId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Extension trait to easily extract request ID from request
pub trait RequestIdExt {
  /// Returns None if the middleware is not configured
  fn request_id(&self) -> Option<RequestId>;
}

impl RequestIdExt for actix_web::HttpRequest {
  fn request_id(&self) -> Option<RequestId> {
    self.extensions().get::<RequestId>().copied()
  }
}
