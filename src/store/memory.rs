//! In-memory backend over DashMap collections.
//!
//! Implements every store capability on one struct. The integration test
//! suite runs the dispatcher against this backend; it also works as a real
//! backend for single-process deployments and demos.

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
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

/// DashMap-backed document store.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tasks: DashMap<Uuid, Task>,
    screenings: DashMap<Uuid, Screening>,
    loans: DashMap<Uuid, Loan>,
    client_acats: DashMap<Uuid, ClientAcat>,
    acats: DashMap<Uuid, Acat>,
    group_screenings: DashMap<Uuid, GroupScreening>,
    clients: DashMap<Uuid, Client>,
    groups: DashMap<Uuid, Group>,
    notifications: DashMap<Uuid, Notification>,
    audit_log: DashMap<Uuid, AuditEntry>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // Seeding helpers for fixtures and demos.

    pub fn insert_task(&self, task: Task) {
        self.tasks.insert(task.task_id, task);
    }

    pub fn insert_screening(&self, screening: Screening) {
        self.screenings.insert(screening.screening_id, screening);
    }

    pub fn insert_loan(&self, loan: Loan) {
        self.loans.insert(loan.loan_id, loan);
    }

    pub fn insert_client_acat(&self, client_acat: ClientAcat) {
        self.client_acats
            .insert(client_acat.client_acat_id, client_acat);
    }

    pub fn insert_acat(&self, acat: Acat) {
        self.acats.insert(acat.acat_id, acat);
    }

    pub fn insert_group_screening(&self, group_screening: GroupScreening) {
        self.group_screenings
            .insert(group_screening.group_screening_id, group_screening);
    }

    pub fn insert_client(&self, client: Client) {
        self.clients.insert(client.client_id, client);
    }

    pub fn insert_group(&self, group: Group) {
        self.groups.insert(group.group_id, group);
    }

    // Inspection helpers: snapshots for assertions and reporting.

    pub fn all_tasks(&self) -> Vec<Task> {
        self.tasks.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn all_notifications(&self) -> Vec<Notification> {
        self.notifications
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn all_audit_entries(&self) -> Vec<AuditEntry> {
        self.audit_log
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }
}

#[async_trait]
impl TaskStore for MemoryBackend {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.tasks.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, new_task: NewTask) -> StoreResult<Task> {
        let now = Utc::now().naive_utc();
        let task = Task {
            task_id: Uuid::new_v4(),
            entity_type: new_task.entity_type,
            entity_ref: new_task.entity_ref,
            task_type: new_task.task_type,
            status: TaskLifecycleStatus::Pending,
            user: new_task.user,
            created_by: new_task.created_by,
            branch: new_task.branch,
            comment: new_task.comment,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.task_id, task.clone());
        Ok(task)
    }

    async fn close_if_pending(
        &self,
        id: Uuid,
        status: TaskLifecycleStatus,
        comment: Option<&str>,
    ) -> StoreResult<Option<Task>> {
        // The entry lock makes check-and-set atomic for this backend.
        match self.tasks.get_mut(&id) {
            Some(mut entry) => {
                let task = entry.value_mut();
                if task.status != TaskLifecycleStatus::Pending {
                    return Ok(None);
                }
                task.status = status;
                if let Some(comment) = comment {
                    task.comment = Some(comment.to_string());
                }
                task.updated_at = Utc::now().naive_utc();
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }
}

macro_rules! impl_memory_entity_store {
    ($trait_name:ident, $field:ident, $model:ty, $status:ty, $label:literal) => {
        #[async_trait]
        impl $trait_name for MemoryBackend {
            async fn get(&self, id: Uuid) -> StoreResult<Option<$model>> {
                Ok(self.$field.get(&id).map(|entry| entry.value().clone()))
            }

            async fn set_status(&self, id: Uuid, status: $status) -> StoreResult<()> {
                match self.$field.get_mut(&id) {
                    Some(mut entry) => {
                        entry.value_mut().status = status;
                        entry.value_mut().updated_at = Utc::now().naive_utc();
                        Ok(())
                    }
                    None => Err(StoreError::Missing(format!(
                        concat!($label, " {}"),
                        id
                    ))),
                }
            }
        }
    };
}

impl_memory_entity_store!(ScreeningStore, screenings, Screening, ScreeningStatus, "screening");
impl_memory_entity_store!(LoanStore, loans, Loan, LoanStatus, "loan");
impl_memory_entity_store!(
    ClientAcatStore,
    client_acats,
    ClientAcat,
    ClientAcatStatus,
    "client ACAT"
);
impl_memory_entity_store!(AcatStore, acats, Acat, AcatStatus, "ACAT");
impl_memory_entity_store!(
    GroupScreeningStore,
    group_screenings,
    GroupScreening,
    GroupScreeningStatus,
    "group screening"
);
impl_memory_entity_store!(ClientStore, clients, Client, ClientStatus, "client");
impl_memory_entity_store!(GroupStore, groups, Group, GroupStatus, "group");

#[async_trait]
impl NotificationSink for MemoryBackend {
    async fn create(&self, notification: NewNotification) -> StoreResult<Notification> {
        let created = Notification {
            notification_id: Uuid::new_v4(),
            for_user: notification.for_user,
            message: notification.message,
            task_ref: notification.task_ref,
            created_at: Utc::now().naive_utc(),
        };
        self.notifications
            .insert(created.notification_id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl AuditTrail for MemoryBackend {
    async fn track(&self, entry: NewAuditEntry) -> StoreResult<AuditEntry> {
        let created = AuditEntry {
            audit_id: Uuid::new_v4(),
            event: entry.event,
            user: entry.user,
            message: entry.message,
            diff: entry.diff,
            created_at: Utc::now().naive_utc(),
        };
        self.audit_log.insert(created.audit_id, created.clone());
        Ok(created)
    }
}
