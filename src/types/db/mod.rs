// Database entities - SeaORM models
pub mod account;
pub mod audit_event;
pub mod revoked_token;
