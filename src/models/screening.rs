//! Client screening form: the first underwriting gate a client passes.

use crate::workflow::states::ScreeningStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screening {
    pub screening_id: Uuid,
    pub client: Uuid,
    pub branch: Uuid,
    pub status: ScreeningStatus,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
