//! Solidarity group of clients.

use crate::workflow::states::GroupStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: Uuid,
    pub branch: Uuid,
    pub status: GroupStatus,
    pub members: Vec<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
