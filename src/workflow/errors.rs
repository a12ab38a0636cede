//! Error taxonomy for the transition workflow.

use super::states::{EntityType, TaskLifecycleStatus};
use crate::permissions::{PermissionCategory, PermissionError};
use crate::store::StoreError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("task {task_id} not found")]
    TaskNotFound { task_id: Uuid },

    #[error("{entity_type} {entity_ref} referenced by task {task_id} not found")]
    EntityNotFound {
        entity_type: EntityType,
        entity_ref: Uuid,
        task_id: Uuid,
    },

    #[error("status '{requested}' is not allowed for {entity_type} tasks; allowed: {allowed:?}")]
    IllegalStatus {
        entity_type: EntityType,
        requested: String,
        allowed: &'static [&'static str],
    },

    #[error("not enough permissions to authorize {category} transitions")]
    NotPermitted { category: PermissionCategory },

    #[error("task {task_id} is already {status}")]
    AlreadyClosed {
        task_id: Uuid,
        status: TaskLifecycleStatus,
    },

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal workflow error: {0}")]
    Internal(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Entity referenced by a task is missing from its store
pub fn entity_missing(entity_type: EntityType, entity_ref: Uuid, task_id: Uuid) -> WorkflowError {
    WorkflowError::EntityNotFound {
        entity_type,
        entity_ref,
        task_id,
    }
}

/// Handler was dispatched an outcome for a different entity type; a closed
/// dispatch table makes this unreachable unless the table itself regresses
pub fn mismatched_outcome(entity_type: EntityType, outcome: &str) -> WorkflowError {
    WorkflowError::Internal(format!(
        "outcome '{outcome}' dispatched to {entity_type} handler"
    ))
}
