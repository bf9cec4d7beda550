//! Authentication use cases
//!
//! Each use case turns a command into exactly one call on the domain
//! [`AuthService`](crate::domain::auth::services::AuthService) and shapes the
//! result for the presentation layer.

mod create_session;
mod get_current_user;
mod login_google;
mod login_social;
mod login_user;
mod logout_user;
mod redirect_google;
mod refresh_access_token;
mod register_user;

pub use create_session::{CreateSessionCommand, CreateSessionResponse, CreateSessionUseCase};
pub use get_current_user::{GetCurrentUserResponse, GetCurrentUserUseCase};
pub use login_google::{LoginGoogleCommand, LoginGoogleUseCase};
pub use login_social::{LoginSocialCommand, LoginSocialUseCase};
pub use login_user::{LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use logout_user::{LogoutUserCommand, LogoutUserUseCase};
pub use redirect_google::{RedirectGoogleCommand, RedirectGoogleResponse, RedirectGoogleUseCase};
pub use refresh_access_token::{
  RefreshAccessTokenCommand, RefreshAccessTokenResponse, RefreshAccessTokenUseCase,
};
pub use register_user::{RegisterUserCommand, RegisterUserResponse, RegisterUserUseCase};

use uuid::Uuid;

/// Response of every external identity login
#[derive(Debug, Clone)]
pub struct ExternalLoginResponse {
  pub user_id: Uuid,
  pub access_token: String,
  /// True when this login created the account
  pub is_new_user: bool,
}

impl From<crate::domain::auth::services::ExternalLogin> for ExternalLoginResponse {
  fn from(login: crate::domain::auth::services::ExternalLogin) -> Self {
    Self {
      user_id: login.user_id,
      access_token: login.access_token,
      is_new_user: login.is_new_user,
    }
  }
}
