//! Transition dispatcher: the single entry point for applying a requested
//! status to a task.
//!
//! Sequence per request: load task → conflict guard → validate the requested
//! status against the entity type's legal set → authorization (skipped for
//! review tasks) → entity-specific handler → audit write → lifecycle event.
//! Validation and authorization failures occur before any write.

use super::errors::{WorkflowError, WorkflowResult};
use super::handlers::{handler_for, TransitionReceipt, WorkflowContext};
use super::outcomes::BusinessOutcome;
use super::states::TaskLifecycleStatus;
use crate::constants::events;
use crate::events::EventPublisher;
use crate::models::{Account, NewAuditEntry, Task};
use crate::permissions::{PermissionAction, PermissionCategory, PermissionOracle};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Validates and applies status transitions with their side effects.
pub struct TransitionDispatcher {
    ctx: WorkflowContext,
    oracle: Arc<dyn PermissionOracle>,
    publisher: EventPublisher,
}

impl TransitionDispatcher {
    pub fn new(
        ctx: WorkflowContext,
        oracle: Arc<dyn PermissionOracle>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            ctx,
            oracle,
            publisher,
        }
    }

    /// Apply `requested_status` to the task, driving the referenced entity
    /// and the transition's side effects.
    ///
    /// Returns the receipt describing what was written. A legal-but-unmapped
    /// status returns a receipt with `applied == false` and writes nothing.
    pub async fn apply_status_transition(
        &self,
        task_id: Uuid,
        requested_status: &str,
        comment: Option<&str>,
        acting: &Account,
    ) -> WorkflowResult<TransitionReceipt> {
        let task = self
            .ctx
            .tasks
            .get(task_id)
            .await?
            .ok_or(WorkflowError::TaskNotFound { task_id })?;

        if task.status != TaskLifecycleStatus::Pending {
            return Err(WorkflowError::AlreadyClosed {
                task_id,
                status: task.status,
            });
        }

        let outcome = BusinessOutcome::parse(task.entity_type, requested_status).map_err(
            |allowed| WorkflowError::IllegalStatus {
                entity_type: task.entity_type,
                requested: requested_status.to_string(),
                allowed,
            },
        )?;

        self.authorize(&task, acting).await?;

        if !outcome.is_mapped() {
            // Accepted upstream but no handler branch exists; surfacing this
            // loudly instead of silently is deliberate.
            warn!(
                task_id = %task_id,
                entity_type = %task.entity_type,
                requested_status,
                "Legal status has no transition mapping; nothing was written"
            );
            if let Err(err) = self
                .publisher
                .publish(
                    events::TASK_TRANSITION_SKIPPED,
                    serde_json::json!({
                        "task_id": task_id,
                        "entity_type": task.entity_type,
                        "requested_status": requested_status,
                    }),
                )
                .await
            {
                warn!(error = %err, "Failed to publish skip event");
            }
            return Ok(TransitionReceipt::skipped(task));
        }

        let handler = handler_for(task.entity_type);
        debug!(
            task_id = %task_id,
            entity_type = %task.entity_type,
            requested_status,
            handler = handler.description(),
            "Dispatching status transition"
        );

        let receipt = handler
            .apply(&self.ctx, &task, &outcome, comment, acting)
            .await?;

        self.record_audit(&task, &receipt, requested_status, acting)
            .await?;
        self.publish_lifecycle_event(&receipt, requested_status).await;

        info!(
            task_id = %task_id,
            requested_status,
            review_spawned = receipt.review_task.is_some(),
            "Status transition applied"
        );
        Ok(receipt)
    }

    /// Review tasks bypass the permission oracle: their assignee was chosen
    /// by the transition that spawned them.
    async fn authorize(&self, task: &Task, acting: &Account) -> WorkflowResult<()> {
        if task.is_review() {
            return Ok(());
        }
        let Some(category) = PermissionCategory::for_entity(task.entity_type) else {
            return Ok(());
        };
        let permitted = self
            .oracle
            .is_permitted(acting, category, PermissionAction::Authorize)
            .await?;
        if !permitted {
            return Err(WorkflowError::NotPermitted { category });
        }
        Ok(())
    }

    async fn record_audit(
        &self,
        original: &Task,
        receipt: &TransitionReceipt,
        requested_status: &str,
        acting: &Account,
    ) -> WorkflowResult<()> {
        let event = if receipt.review_task.is_some() {
            events::TASK_REVIEW_REQUESTED
        } else if receipt.task.status == TaskLifecycleStatus::Cancelled {
            events::TASK_CANCELLED
        } else {
            events::TASK_COMPLETED
        };
        let diff = serde_json::json!({
            "task": {
                "before": original.status,
                "after": receipt.task.status,
            },
            "entity_status": receipt.entity_status,
            "related_status": receipt.related_status,
        });
        self.ctx
            .audit
            .track(NewAuditEntry {
                event: event.to_string(),
                user: acting.account_id,
                message: format!(
                    "{} task {} transitioned to {requested_status}",
                    original.entity_type, original.task_id
                ),
                diff,
            })
            .await?;
        Ok(())
    }

    /// Best-effort: a lost event never fails an applied transition.
    async fn publish_lifecycle_event(&self, receipt: &TransitionReceipt, requested_status: &str) {
        let context = serde_json::json!({
            "task_id": receipt.task.task_id,
            "entity_type": receipt.task.entity_type,
            "requested_status": requested_status,
            "entity_status": receipt.entity_status,
            "review_task_id": receipt.review_task.as_ref().map(|t| t.task_id),
        });
        if let Err(err) = self
            .publisher
            .publish(events::ENTITY_STATUS_CHANGED, context)
            .await
        {
            warn!(error = %err, "Failed to publish transition event");
        }
    }

    /// Subscribe to lifecycle events published by this dispatcher
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::events::PublishedEvent> {
        self.publisher.subscribe()
    }
}
