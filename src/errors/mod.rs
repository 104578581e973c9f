// Errors layer - Error type definitions
pub mod auth;
pub mod store;

// Re-exports for convenience
pub use auth::AuthError;
pub use store::StoreError;
