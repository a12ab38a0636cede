//! Audit log entries written after each applied transition.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub audit_id: Uuid,
    /// Lifecycle event name, see [`crate::constants::events`]
    pub event: String,
    /// Acting account
    pub user: Uuid,
    pub message: String,
    /// Before/after snapshot of the statuses the transition touched
    pub diff: serde_json::Value,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub event: String,
    pub user: Uuid,
    pub message: String,
    pub diff: serde_json::Value,
}
