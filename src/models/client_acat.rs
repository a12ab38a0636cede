//! Client-level agronomic cost-assessment (ACAT): aggregates the per-crop
//! ACAT forms a client submits for a loan cycle.

use crate::workflow::states::ClientAcatStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientAcat {
    pub client_acat_id: Uuid,
    pub client: Uuid,
    pub branch: Uuid,
    pub status: ClientAcatStatus,
    /// Per-crop ACAT forms rolled up under this assessment
    pub acats: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
