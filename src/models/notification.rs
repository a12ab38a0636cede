//! User-facing notification referencing a task. Created as a transition side
//! effect, never mutated.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: Uuid,
    /// Recipient user id
    pub for_user: Uuid,
    pub message: String,
    pub task_ref: Uuid,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub for_user: Uuid,
    pub message: String,
    pub task_ref: Uuid,
}
