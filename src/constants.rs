//! # System Constants
//!
//! Event names, distinguished task types, and status-group helpers shared
//! across the workflow core.

/// Task type whose holders bypass the AUTHORIZE permission check
pub const REVIEW_TASK_TYPE: &str = "review";

/// Lifecycle events published after applied transitions
pub mod events {
    pub const TASK_COMPLETED: &str = "task.completed";
    pub const TASK_CANCELLED: &str = "task.cancelled";
    pub const TASK_REVIEW_REQUESTED: &str = "task.review_requested";
    pub const TASK_TRANSITION_SKIPPED: &str = "task.transition_skipped";
    pub const ENTITY_STATUS_CHANGED: &str = "entity.status_changed";
}

/// Status groupings used for reporting and assertions
pub mod status_groups {
    use crate::workflow::states::TaskLifecycleStatus;

    /// Lifecycle statuses that close a task for good
    pub const TERMINAL_LIFECYCLE: [TaskLifecycleStatus; 2] =
        [TaskLifecycleStatus::Completed, TaskLifecycleStatus::Cancelled];

    pub fn is_terminal(status: TaskLifecycleStatus) -> bool {
        TERMINAL_LIFECYCLE.contains(&status)
    }
}
