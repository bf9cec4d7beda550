mod google;
mod mock;

pub use google::GoogleOAuthProvider;
pub use mock::MockOAuthProvider;
