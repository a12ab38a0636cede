//! Per-crop agronomic cost-assessment form.

use crate::workflow::states::AcatStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acat {
    pub acat_id: Uuid,
    pub client: Uuid,
    /// Owning client-level assessment
    pub client_acat: Uuid,
    pub branch: Uuid,
    pub status: AcatStatus,
    pub crop: Option<String>,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
