pub mod cookies;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use cookies::RefreshCookie;
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::auth::health_handler;
pub use middleware::{AuthMiddleware, AuthUser, AuthenticatedUser, RequestId, RequestIdMiddleware};
pub use routes::{AuthRouteDependencies, GoogleRouteDependencies, configure_auth_routes};
