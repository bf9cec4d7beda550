use actix_web::web;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::cookies::RefreshCookie;
use super::handlers::{
  auth::{
    get_current_user_handler, login_handler, logout_handler, refresh_handler, register_handler,
  },
  oauth::{google_callback_handler, google_redirect_handler},
};
use super::middleware::AuthMiddleware;
use crate::application::auth::{
  GetCurrentUserUseCase, LoginGoogleUseCase, LoginUserUseCase, LogoutUserUseCase,
  RedirectGoogleUseCase, RefreshAccessTokenUseCase, RegisterUserUseCase,
};
use crate::domain::auth::ports::TokenService;

/// Use cases behind the Google sign-in routes
#[derive(Clone)]
pub struct GoogleRouteDependencies {
  pub login: Arc<LoginGoogleUseCase>,
  pub redirect: Arc<RedirectGoogleUseCase>,
}

/// Everything the auth routes need, built once in `main`
#[derive(Clone)]
pub struct AuthRouteDependencies {
  pub register: Arc<RegisterUserUseCase>,
  pub login: Arc<LoginUserUseCase>,
  /// `None` leaves the Google routes unmounted
  pub google: Option<GoogleRouteDependencies>,
  pub refresh: Arc<RefreshAccessTokenUseCase>,
  pub logout: Arc<LogoutUserUseCase>,
  pub current_user: Arc<GetCurrentUserUseCase>,
  pub token_service: Arc<dyn TokenService>,
  pub refresh_cookie: RefreshCookie,
  /// Cancelled when the server shuts down
  pub shutdown: CancellationToken,
}

/// Configure authentication routes, mounted under `/api/v1/auth`
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, deps: AuthRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.register))
    .app_data(web::Data::new(deps.login))
    .app_data(web::Data::new(deps.refresh))
    .app_data(web::Data::new(deps.logout))
    .app_data(web::Data::new(deps.current_user))
    .app_data(web::Data::new(deps.refresh_cookie))
    .route("/register", web::post().to(register_handler))
    .route("/login", web::post().to(login_handler))
    .service(
      web::resource("/refresh")
        .route(web::post().to(refresh_handler))
        .route(web::delete().to(logout_handler)),
    )
    .service(
      web::resource("/me")
        .wrap(AuthMiddleware::new(deps.token_service))
        .route(web::get().to(get_current_user_handler)),
    );

  if let Some(google) = deps.google {
    cfg
      .app_data(web::Data::new(google.login))
      .app_data(web::Data::new(google.redirect))
      .app_data(web::Data::new(deps.shutdown))
      .route("/google/redirect", web::get().to(google_redirect_handler))
      .route("/google/callback", web::get().to(google_callback_handler));
  }
}
