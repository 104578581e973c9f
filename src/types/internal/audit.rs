use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Event kinds recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Register,
    Login,
    LoginFailed,
    Logout,
    ChangePassword,
    UpdateData,
}

impl EventType {
    /// Convert EventType to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::Login => "LOGIN",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Logout => "LOGOUT",
            Self::ChangePassword => "CHANGE_PASSWORD",
            Self::UpdateData => "UPDATE_DATA",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of resource an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTargetType {
    Profile,
}

impl EventTargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "PROFILE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditTarget {
    pub id: String,
    pub kind: EventTargetType,
}

/// Old/new snapshots of the fields an update touched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditChange {
    pub old_data: Map<String, Value>,
    pub new_data: Map<String, Value>,
}

/// Audit event handed to the audit log
///
/// The event time is not part of the value; the store stamps it at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub actor_id: Option<String>,
    pub target: Option<AuditTarget>,
    pub change: Option<AuditChange>,
}

impl AuditEvent {
    /// Create a new audit event with no actor
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            actor_id: None,
            target: None,
            change: None,
        }
    }

    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn target(mut self, id: impl Into<String>, kind: EventTargetType) -> Self {
        self.target = Some(AuditTarget { id: id.into(), kind });
        self
    }

    pub fn change(mut self, change: AuditChange) -> Self {
        self.change = Some(change);
        self
    }
}
