//! Permission oracle: resolves whether an account's role grants an action on
//! an entity category.
//!
//! The dispatcher treats this as an opaque boolean check. Categories map one
//! per business entity type; group screenings authorize under the GROUP
//! category. Matching against a permission's operation set is
//! case-insensitive, per the upstream role model.

pub mod role_oracle;

use crate::models::Account;
use crate::workflow::states::EntityType;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

pub use role_oracle::RolePermissionOracle;

/// Entity category a permission applies to. Wire strings keep the upstream
/// capitalization quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionCategory {
    #[serde(rename = "SCREENING")]
    Screening,
    #[serde(rename = "LOAN")]
    Loan,
    #[serde(rename = "Client_ACAT")]
    ClientAcat,
    #[serde(rename = "ACAT")]
    Acat,
    #[serde(rename = "GROUP")]
    Group,
}

impl PermissionCategory {
    /// Category guarding transitions for an entity type. Generic tasks have
    /// no business entity and therefore no category.
    pub fn for_entity(entity_type: EntityType) -> Option<Self> {
        match entity_type {
            EntityType::Screening => Some(Self::Screening),
            EntityType::Loan => Some(Self::Loan),
            EntityType::ClientAcat => Some(Self::ClientAcat),
            EntityType::Acat => Some(Self::Acat),
            EntityType::GroupScreening => Some(Self::Group),
            EntityType::Other => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screening => "SCREENING",
            Self::Loan => "LOAN",
            Self::ClientAcat => "Client_ACAT",
            Self::Acat => "ACAT",
            Self::Group => "GROUP",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations a role may hold on a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
    /// Gate for applying status transitions
    Authorize,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Authorize => "AUTHORIZE",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors surfaced while resolving permissions.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    #[error("permission lookup failed: {0}")]
    Lookup(String),
}

impl From<sqlx::Error> for PermissionError {
    fn from(err: sqlx::Error) -> Self {
        Self::Lookup(err.to_string())
    }
}

pub type PermissionResult<T> = Result<T, PermissionError>;

/// Capability resolving whether an account may perform an action on a
/// category. Injected into the dispatcher, never a module-level singleton.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn is_permitted(
        &self,
        account: &Account,
        category: PermissionCategory,
        action: PermissionAction,
    ) -> PermissionResult<bool>;
}

/// In-process oracle over an explicit grant table. Used by tests and
/// single-process deployments.
#[derive(Debug, Default)]
pub struct StaticPermissionOracle {
    grants: RwLock<HashMap<Uuid, HashSet<(PermissionCategory, PermissionAction)>>>,
}

impl StaticPermissionOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `action` on `category` to every account holding `role`.
    pub fn grant(&self, role: Uuid, category: PermissionCategory, action: PermissionAction) {
        self.grants
            .write()
            .entry(role)
            .or_default()
            .insert((category, action));
    }

    /// Grant AUTHORIZE on every category to `role`.
    pub fn grant_authorize_all(&self, role: Uuid) {
        for category in [
            PermissionCategory::Screening,
            PermissionCategory::Loan,
            PermissionCategory::ClientAcat,
            PermissionCategory::Acat,
            PermissionCategory::Group,
        ] {
            self.grant(role, category, PermissionAction::Authorize);
        }
    }
}

#[async_trait]
impl PermissionOracle for StaticPermissionOracle {
    async fn is_permitted(
        &self,
        account: &Account,
        category: PermissionCategory,
        action: PermissionAction,
    ) -> PermissionResult<bool> {
        let Some(role) = account.role else {
            return Ok(false);
        };
        let grants = self.grants.read();
        Ok(grants
            .get(&role)
            .is_some_and(|set| set.contains(&(category, action))))
    }
}
