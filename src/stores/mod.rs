// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod credential_store;
pub mod revocation_store;

pub use audit_store::{AuditLog, AuditStore};
pub use credential_store::{CredentialRepository, CredentialStore};
pub use revocation_store::{RevocationList, RevocationStore};
