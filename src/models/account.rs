//! Acting account: the identity resolved upstream of the workflow core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    /// Role reference resolved by the permission oracle; accounts without a
    /// role hold no permissions
    pub role: Option<Uuid>,
    pub branch: Uuid,
}

impl Account {
    pub fn new(account_id: Uuid, role: Option<Uuid>, branch: Uuid) -> Self {
        Self {
            account_id,
            role,
            branch,
        }
    }
}
