//! Client record. Only the derived underwriting status is of interest to the
//! workflow core; demographic fields live with the out-of-scope CRUD layer.

use crate::workflow::states::ClientStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: Uuid,
    pub branch: Uuid,
    pub status: ClientStatus,
    pub group: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
