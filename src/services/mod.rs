// Services layer - Business logic and orchestration
pub mod auth_service;
pub mod crypto;
pub mod token_service;

pub use auth_service::AuthService;
pub use crypto::PasswordCrypto;
pub use token_service::TokenService;
