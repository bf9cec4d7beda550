mod argon2_encrypter;
mod jwt_token_service;
mod refresh_token_generator;

pub use argon2_encrypter::Argon2PasswordEncrypter;
pub use jwt_token_service::JwtTokenService;
pub use refresh_token_generator::SecureRefreshTokenGenerator;
