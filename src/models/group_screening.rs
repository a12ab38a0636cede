//! Group screening form. Unlike the client-scoped forms, a group screening
//! drives the status of the linked solidarity group, not a client.

use crate::workflow::states::GroupScreeningStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScreening {
    pub group_screening_id: Uuid,
    pub group: Uuid,
    pub branch: Uuid,
    pub status: GroupScreeningStatus,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
