//! Role-resolving permission oracle over PostgreSQL.
//!
//! Resolution path: account.role → role's permission set → any permission on
//! the category whose operation list contains the action, compared
//! case-insensitively.

use super::{
    PermissionAction, PermissionCategory, PermissionError, PermissionOracle, PermissionResult,
};
use crate::models::Account;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Oracle backed by `lomis_roles` / `lomis_permissions`:
/// ```sql
/// CREATE TABLE lomis_roles (
///   role_id UUID PRIMARY KEY,
///   name TEXT NOT NULL,
///   permissions UUID[] NOT NULL DEFAULT '{}'
/// );
/// CREATE TABLE lomis_permissions (
///   permission_id UUID PRIMARY KEY,
///   entity TEXT NOT NULL,
///   operations TEXT[] NOT NULL DEFAULT '{}'
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RolePermissionOracle {
    pool: PgPool,
}

impl RolePermissionOracle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    entity: String,
    operations: Vec<String>,
}

#[async_trait]
impl PermissionOracle for RolePermissionOracle {
    async fn is_permitted(
        &self,
        account: &Account,
        category: PermissionCategory,
        action: PermissionAction,
    ) -> PermissionResult<bool> {
        let Some(role) = account.role else {
            return Ok(false);
        };

        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT p.entity, p.operations \
             FROM lomis_roles r \
             JOIN lomis_permissions p ON p.permission_id = ANY(r.permissions) \
             WHERE r.role_id = $1",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(PermissionError::from)?;

        let permitted = rows.iter().any(|row| {
            row.entity.eq_ignore_ascii_case(category.as_str())
                && row
                    .operations
                    .iter()
                    .any(|op| op.eq_ignore_ascii_case(action.as_str()))
        });
        Ok(permitted)
    }
}
