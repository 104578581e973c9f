// Caller-supplied input shapes and their validation
pub mod auth;
pub mod user;

pub use auth::Credentials;
pub use user::ProfileUpdate;
