pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{DeviceInfo, ExternalUser, User, UserProfile, UserProvider, UserSession};
pub use errors::{AuthError, HashError, RepositoryError, ValidationError};
pub use value_objects::{Email, Password, PasswordHash, ProviderKind, RefreshToken, TokenHash};
