pub mod session_repository;
pub mod user_profile_repository;
pub mod user_provider_repository;
pub mod user_repository;

pub use session_repository::PostgresSessionRepository;
pub use user_profile_repository::PostgresUserProfileRepository;
pub use user_provider_repository::PostgresUserProviderRepository;
pub use user_repository::PostgresUserRepository;
