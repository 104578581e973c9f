use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, Set};

use crate::errors::StoreError;
use crate::types::db::audit_event;
use crate::types::internal::audit::AuditEvent;

/// Append-only sink for audit events
///
/// The only capability the auth service needs from the audit trail. No update,
/// delete or query; retention is handled outside this crate.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, event: AuditEvent) -> Result<(), StoreError>;
}

/// Repository for audit event storage operations
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLog for AuditStore {
    /// Write an audit event, stamping the event time in UTC
    async fn append(&self, event: AuditEvent) -> Result<(), StoreError> {
        let change = event
            .change
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let (target_id, target_type) = match event.target {
            Some(target) => (Some(target.id), Some(target.kind.as_str().to_string())),
            None => (None, None),
        };

        let record = audit_event::ActiveModel {
            id: NotSet,
            actor_id: Set(event.actor_id),
            event_type: Set(event.event_type.as_str().to_string()),
            event_time: Set(Utc::now().to_rfc3339()),
            target_id: Set(target_id),
            target_type: Set(target_type),
            change: Set(change),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::database("append_audit_event", e))?;

        tracing::debug!(event_type = %event.event_type, "Audit event written");

        Ok(())
    }
}
