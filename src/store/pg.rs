//! PostgreSQL backend over the `lomis_*` tables.
//!
//! Uses the sqlx runtime query API so the crate builds without a live schema.
//! Status columns are stored as text in the upstream wire vocabulary and
//! parsed back into the typed enums on read; a value outside the vocabulary
//! surfaces as [`StoreError::Corrupt`] rather than panicking.
//!
//! Expected schema (abridged):
//! ```sql
//! CREATE TABLE lomis_tasks (
//!   task_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!   entity_type TEXT NOT NULL,
//!   entity_ref UUID NOT NULL,
//!   task_type TEXT NOT NULL,
//!   status TEXT NOT NULL DEFAULT 'pending',
//!   assignee UUID,
//!   created_by UUID NOT NULL,
//!   branch UUID NOT NULL,
//!   comment TEXT,
//!   created_at TIMESTAMP NOT NULL DEFAULT NOW(),
//!   updated_at TIMESTAMP NOT NULL DEFAULT NOW()
//! );
//! -- lomis_screenings, lomis_loans, lomis_client_acats, lomis_acats,
//! -- lomis_group_screenings, lomis_clients, lomis_groups,
//! -- lomis_notifications, lomis_audit_log follow the same shape.
//! ```

use super::{
    AcatStore, AuditTrail, ClientAcatStore, ClientStore, GroupScreeningStore, GroupStore,
    LoanStore, NotificationSink, ScreeningStore, StoreError, StoreResult, TaskStore,
};
use crate::models::{
    Acat, AuditEntry, Client, ClientAcat, Group, GroupScreening, Loan, NewAuditEntry,
    NewNotification, NewTask, Notification, Screening, Task,
};
use crate::workflow::states::{
    AcatStatus, ClientAcatStatus, ClientStatus, GroupScreeningStatus, GroupStatus, LoanStatus,
    ScreeningStatus, TaskLifecycleStatus,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// All store capabilities over one connection pool.
#[derive(Debug, Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{what}: {err}"))
}

#[derive(Debug, FromRow)]
struct TaskRow {
    task_id: Uuid,
    entity_type: String,
    entity_ref: Uuid,
    task_type: String,
    status: String,
    assignee: Option<Uuid>,
    created_by: Uuid,
    branch: Uuid,
    comment: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            task_id: row.task_id,
            entity_type: row
                .entity_type
                .parse()
                .map_err(|e| corrupt("task entity_type", e))?,
            entity_ref: row.entity_ref,
            task_type: row.task_type,
            status: row.status.parse().map_err(|e| corrupt("task status", e))?,
            user: row.assignee,
            created_by: row.created_by,
            branch: row.branch,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const TASK_COLUMNS: &str = "task_id, entity_type, entity_ref, task_type, status, assignee, \
                            created_by, branch, comment, created_at, updated_at";

#[async_trait]
impl TaskStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM lomis_tasks WHERE task_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::try_from).transpose()
    }

    async fn create(&self, new_task: NewTask) -> StoreResult<Task> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "INSERT INTO lomis_tasks \
             (entity_type, entity_ref, task_type, status, assignee, created_by, branch, comment) \
             VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(new_task.entity_type.to_string())
        .bind(new_task.entity_ref)
        .bind(new_task.task_type)
        .bind(new_task.user)
        .bind(new_task.created_by)
        .bind(new_task.branch)
        .bind(new_task.comment)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn close_if_pending(
        &self,
        id: Uuid,
        status: TaskLifecycleStatus,
        comment: Option<&str>,
    ) -> StoreResult<Option<Task>> {
        // The `status = 'pending'` predicate is the optimistic-concurrency
        // precondition; a raced duplicate matches zero rows.
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "UPDATE lomis_tasks \
             SET status = $2, comment = COALESCE($3, comment), updated_at = NOW() \
             WHERE task_id = $1 AND status = 'pending' \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(status.to_string())
        .bind(comment)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::try_from).transpose()
    }
}

async fn set_status_text(
    pool: &PgPool,
    table: &str,
    id_column: &str,
    id: Uuid,
    status: String,
) -> StoreResult<()> {
    let result = sqlx::query(&format!(
        "UPDATE {table} SET status = $2, updated_at = NOW() WHERE {id_column} = $1"
    ))
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::Missing(format!("{table} row {id}")));
    }
    Ok(())
}

#[derive(Debug, FromRow)]
struct ScreeningRow {
    screening_id: Uuid,
    client: Uuid,
    branch: Uuid,
    status: String,
    created_by: Uuid,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl ScreeningStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Screening>> {
        let row = sqlx::query_as::<_, ScreeningRow>(
            "SELECT screening_id, client, branch, status, created_by, created_at, updated_at \
             FROM lomis_screenings WHERE screening_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| {
            Ok(Screening {
                screening_id: row.screening_id,
                client: row.client,
                branch: row.branch,
                status: row
                    .status
                    .parse::<ScreeningStatus>()
                    .map_err(|e| corrupt("screening status", e))?,
                created_by: row.created_by,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn set_status(&self, id: Uuid, status: ScreeningStatus) -> StoreResult<()> {
        set_status_text(
            &self.pool,
            "lomis_screenings",
            "screening_id",
            id,
            status.to_string(),
        )
        .await
    }
}

#[derive(Debug, FromRow)]
struct LoanRow {
    loan_id: Uuid,
    client: Uuid,
    branch: Uuid,
    status: String,
    created_by: Uuid,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl LoanStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Loan>> {
        let row = sqlx::query_as::<_, LoanRow>(
            "SELECT loan_id, client, branch, status, created_by, created_at, updated_at \
             FROM lomis_loans WHERE loan_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| {
            Ok(Loan {
                loan_id: row.loan_id,
                client: row.client,
                branch: row.branch,
                status: row
                    .status
                    .parse::<LoanStatus>()
                    .map_err(|e| corrupt("loan status", e))?,
                created_by: row.created_by,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn set_status(&self, id: Uuid, status: LoanStatus) -> StoreResult<()> {
        set_status_text(&self.pool, "lomis_loans", "loan_id", id, status.to_string()).await
    }
}

#[derive(Debug, FromRow)]
struct ClientAcatRow {
    client_acat_id: Uuid,
    client: Uuid,
    branch: Uuid,
    status: String,
    acats: Vec<Uuid>,
    created_by: Uuid,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl ClientAcatStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<ClientAcat>> {
        let row = sqlx::query_as::<_, ClientAcatRow>(
            "SELECT client_acat_id, client, branch, status, acats, created_by, created_at, \
             updated_at FROM lomis_client_acats WHERE client_acat_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| {
            Ok(ClientAcat {
                client_acat_id: row.client_acat_id,
                client: row.client,
                branch: row.branch,
                status: row
                    .status
                    .parse::<ClientAcatStatus>()
                    .map_err(|e| corrupt("client ACAT status", e))?,
                acats: row.acats,
                created_by: row.created_by,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn set_status(&self, id: Uuid, status: ClientAcatStatus) -> StoreResult<()> {
        set_status_text(
            &self.pool,
            "lomis_client_acats",
            "client_acat_id",
            id,
            status.to_string(),
        )
        .await
    }
}

#[derive(Debug, FromRow)]
struct AcatRow {
    acat_id: Uuid,
    client: Uuid,
    client_acat: Uuid,
    branch: Uuid,
    status: String,
    crop: Option<String>,
    created_by: Uuid,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl AcatStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Acat>> {
        let row = sqlx::query_as::<_, AcatRow>(
            "SELECT acat_id, client, client_acat, branch, status, crop, created_by, created_at, \
             updated_at FROM lomis_acats WHERE acat_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| {
            Ok(Acat {
                acat_id: row.acat_id,
                client: row.client,
                client_acat: row.client_acat,
                branch: row.branch,
                status: row
                    .status
                    .parse::<AcatStatus>()
                    .map_err(|e| corrupt("ACAT status", e))?,
                crop: row.crop,
                created_by: row.created_by,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn set_status(&self, id: Uuid, status: AcatStatus) -> StoreResult<()> {
        set_status_text(&self.pool, "lomis_acats", "acat_id", id, status.to_string()).await
    }
}

#[derive(Debug, FromRow)]
struct GroupScreeningRow {
    group_screening_id: Uuid,
    group: Uuid,
    branch: Uuid,
    status: String,
    created_by: Uuid,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl GroupScreeningStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<GroupScreening>> {
        let row = sqlx::query_as::<_, GroupScreeningRow>(
            "SELECT group_screening_id, \"group\", branch, status, created_by, created_at, \
             updated_at FROM lomis_group_screenings WHERE group_screening_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| {
            Ok(GroupScreening {
                group_screening_id: row.group_screening_id,
                group: row.group,
                branch: row.branch,
                status: row
                    .status
                    .parse::<GroupScreeningStatus>()
                    .map_err(|e| corrupt("group screening status", e))?,
                created_by: row.created_by,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn set_status(&self, id: Uuid, status: GroupScreeningStatus) -> StoreResult<()> {
        set_status_text(
            &self.pool,
            "lomis_group_screenings",
            "group_screening_id",
            id,
            status.to_string(),
        )
        .await
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    client_id: Uuid,
    branch: Uuid,
    status: String,
    group_ref: Option<Uuid>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl ClientStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT client_id, branch, status, group_ref, created_at, updated_at \
             FROM lomis_clients WHERE client_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| {
            Ok(Client {
                client_id: row.client_id,
                branch: row.branch,
                status: row
                    .status
                    .parse::<ClientStatus>()
                    .map_err(|e| corrupt("client status", e))?,
                group: row.group_ref,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn set_status(&self, id: Uuid, status: ClientStatus) -> StoreResult<()> {
        set_status_text(
            &self.pool,
            "lomis_clients",
            "client_id",
            id,
            status.to_string(),
        )
        .await
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    group_id: Uuid,
    branch: Uuid,
    status: String,
    members: Vec<Uuid>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl GroupStore for PgBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT group_id, branch, status, members, created_at, updated_at \
             FROM lomis_groups WHERE group_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| {
            Ok(Group {
                group_id: row.group_id,
                branch: row.branch,
                status: row
                    .status
                    .parse::<GroupStatus>()
                    .map_err(|e| corrupt("group status", e))?,
                members: row.members,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn set_status(&self, id: Uuid, status: GroupStatus) -> StoreResult<()> {
        set_status_text(
            &self.pool,
            "lomis_groups",
            "group_id",
            id,
            status.to_string(),
        )
        .await
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    notification_id: Uuid,
    for_user: Uuid,
    message: String,
    task_ref: Uuid,
    created_at: NaiveDateTime,
}

#[async_trait]
impl NotificationSink for PgBackend {
    async fn create(&self, notification: NewNotification) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, NotificationRow>(
            "INSERT INTO lomis_notifications (for_user, message, task_ref) \
             VALUES ($1, $2, $3) \
             RETURNING notification_id, for_user, message, task_ref, created_at",
        )
        .bind(notification.for_user)
        .bind(notification.message)
        .bind(notification.task_ref)
        .fetch_one(&self.pool)
        .await?;
        Ok(Notification {
            notification_id: row.notification_id,
            for_user: row.for_user,
            message: row.message,
            task_ref: row.task_ref,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct AuditRow {
    audit_id: Uuid,
    event: String,
    user_ref: Uuid,
    message: String,
    diff: serde_json::Value,
    created_at: NaiveDateTime,
}

#[async_trait]
impl AuditTrail for PgBackend {
    async fn track(&self, entry: NewAuditEntry) -> StoreResult<AuditEntry> {
        let row = sqlx::query_as::<_, AuditRow>(
            "INSERT INTO lomis_audit_log (event, user_ref, message, diff) \
             VALUES ($1, $2, $3, $4) \
             RETURNING audit_id, event, user_ref, message, diff, created_at",
        )
        .bind(entry.event)
        .bind(entry.user)
        .bind(entry.message)
        .bind(entry.diff)
        .fetch_one(&self.pool)
        .await?;
        Ok(AuditEntry {
            audit_id: row.audit_id,
            event: row.event,
            user: row.user_ref,
            message: row.message,
            diff: row.diff,
            created_at: row.created_at,
        })
    }
}
