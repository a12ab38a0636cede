//! # Task Model
//!
//! A task is the unit of work in the back office: one pending action on one
//! business entity, assigned to a user (or left open for any holder of the
//! relevant branch role) and closed by a status transition.
//!
//! ## Overview
//!
//! Tasks carry two distinct status domains. The `status` field here is the
//! task's own lifecycle (`pending` / `completed` / `cancelled`); the status a
//! caller requests when transitioning is a business outcome whose vocabulary
//! is fixed by `entity_type`. See [`crate::workflow`] for the transition
//! machinery.
//!
//! ## Review tasks
//!
//! `task_type == "review"` marks a follow-up task created when an authorizer
//! sends an entity back for revision. It is assigned to the original
//! submitter (reversing the assignment direction of the task it answers) and
//! is exempt from the AUTHORIZE permission check, since the reviewer was
//! explicitly chosen by the prior transition.
//!
//! ## Storage
//!
//! Maps to the `lomis_tasks` collection/table:
//! - `task_id`: primary key (UUID)
//! - `entity_type` / `entity_ref`: the referenced business entity
//! - `status`: task lifecycle, never a business status
//! - `user`: assignee, nullable
//! - `created_by` / `branch`: provenance and tenancy

use crate::constants::REVIEW_TASK_TYPE;
use crate::workflow::states::{EntityType, TaskLifecycleStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A work item tracking one pending action on one business entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: Uuid,
    pub entity_type: EntityType,
    /// Id of the referenced business entity
    pub entity_ref: Uuid,
    /// Free-form kind; `"review"` is distinguished
    pub task_type: String,
    pub status: TaskLifecycleStatus,
    /// Assignee; `None` means any holder of the relevant branch role
    pub user: Option<Uuid>,
    pub created_by: Uuid,
    pub branch: Uuid,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Task {
    /// Review tasks bypass the AUTHORIZE permission check
    pub fn is_review(&self) -> bool {
        self.task_type == REVIEW_TASK_TYPE
    }

    /// Whether this task still accepts transitions
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// New task for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub entity_type: EntityType,
    pub entity_ref: Uuid,
    pub task_type: String,
    pub user: Option<Uuid>,
    pub created_by: Uuid,
    pub branch: Uuid,
    pub comment: Option<String>,
}

impl NewTask {
    /// Follow-up review task answering `original`: same entity, assignment
    /// direction reversed (the original creator becomes the assignee).
    pub fn review_of(original: &Task, acting_account: Uuid, branch: Uuid) -> Self {
        Self {
            entity_type: original.entity_type,
            entity_ref: original.entity_ref,
            task_type: REVIEW_TASK_TYPE.to_string(),
            user: Some(original.created_by),
            created_by: acting_account,
            branch,
            comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task_fixture(task_type: &str) -> Task {
        Task {
            task_id: Uuid::new_v4(),
            entity_type: EntityType::Screening,
            entity_ref: Uuid::new_v4(),
            task_type: task_type.to_string(),
            status: TaskLifecycleStatus::Pending,
            user: Some(Uuid::new_v4()),
            created_by: Uuid::new_v4(),
            branch: Uuid::new_v4(),
            comment: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_review_detection() {
        assert!(task_fixture("review").is_review());
        assert!(!task_fixture("screening_approval").is_review());
    }

    #[test]
    fn test_review_of_reverses_assignment() {
        let original = task_fixture("screening_approval");
        let authorizer = Uuid::new_v4();
        let branch = Uuid::new_v4();

        let review = NewTask::review_of(&original, authorizer, branch);
        assert_eq!(review.task_type, "review");
        assert_eq!(review.entity_ref, original.entity_ref);
        assert_eq!(review.user, Some(original.created_by));
        assert_eq!(review.created_by, authorizer);
        assert_eq!(review.branch, branch);
    }
}
