//! Persistence capabilities the workflow core depends on.
//!
//! The surrounding back office owns full CRUD for every collection; the
//! transition workflow only needs the narrow operations below, so they are
//! expressed as injected capabilities rather than a concrete database layer.
//! Two backends ship with the crate: [`memory::MemoryBackend`] and
//! [`pg::PgBackend`].

pub mod memory;
pub mod pg;

use crate::models::{
    Acat, AuditEntry, Client, ClientAcat, Group, GroupScreening, Loan, NewAuditEntry,
    NewNotification, NewTask, Notification, Screening, Task,
};
use crate::workflow::states::{
    AcatStatus, ClientAcatStatus, ClientStatus, GroupScreeningStatus, GroupStatus, LoanStatus,
    ScreeningStatus, TaskLifecycleStatus,
};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryBackend;
pub use pg::PgBackend;

/// Errors surfaced by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
    /// Targeted write on a row that does not exist
    #[error("{0} not found")]
    Missing(String),
    #[error("stored document is corrupt: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for work items.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Task>>;

    async fn create(&self, new_task: NewTask) -> StoreResult<Task>;

    /// Close the task with `status` and `comment`, but only if it is still
    /// pending. Returns `None` when the task was already closed (or closed
    /// concurrently); the caller decides whether that is a conflict.
    async fn close_if_pending(
        &self,
        id: Uuid,
        status: TaskLifecycleStatus,
        comment: Option<&str>,
    ) -> StoreResult<Option<Task>>;
}

#[async_trait]
pub trait ScreeningStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Screening>>;
    async fn set_status(&self, id: Uuid, status: ScreeningStatus) -> StoreResult<()>;
}

#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Loan>>;
    async fn set_status(&self, id: Uuid, status: LoanStatus) -> StoreResult<()>;
}

#[async_trait]
pub trait ClientAcatStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<ClientAcat>>;
    async fn set_status(&self, id: Uuid, status: ClientAcatStatus) -> StoreResult<()>;
}

#[async_trait]
pub trait AcatStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Acat>>;
    async fn set_status(&self, id: Uuid, status: AcatStatus) -> StoreResult<()>;
}

#[async_trait]
pub trait GroupScreeningStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<GroupScreening>>;
    async fn set_status(&self, id: Uuid, status: GroupScreeningStatus) -> StoreResult<()>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Client>>;
    async fn set_status(&self, id: Uuid, status: ClientStatus) -> StoreResult<()>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Group>>;
    async fn set_status(&self, id: Uuid, status: GroupStatus) -> StoreResult<()>;
}

/// Fire-and-forget creation of user-facing messages referencing a task.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn create(&self, notification: NewNotification) -> StoreResult<Notification>;
}

/// Append-only audit log.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    async fn track(&self, entry: NewAuditEntry) -> StoreResult<AuditEntry>;
}
